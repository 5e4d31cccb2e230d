//! The Output Assembler (§4.3): rank 0 gathers every worker's line buffer,
//! stable-sorts by ascending candidate count, and writes the final file.

use std::fs;
use std::io;
use std::path::Path;

use crate::collective::Rank;
use crate::coordinator::MisspelledRecord;

pub const OUTPUT_PATH: &str = "results/word_list_misspelled.txt";

/// Gathers `own_records` from every rank onto rank 0. Returns `Some(sorted)`
/// on rank 0, `None` on every other rank.
pub fn assemble(comm: &Rank, own_records: Vec<MisspelledRecord>) -> Option<Vec<MisspelledRecord>> {
    if comm.rank() != 0 {
        let mut line_bytes = Vec::new();
        let mut count_bytes = Vec::new();
        for record in &own_records {
            line_bytes.extend_from_slice(record.line.as_bytes());
            count_bytes.extend_from_slice(&record.candidate_count.to_le_bytes());
        }
        comm.send_bytes(0, line_bytes);
        comm.send_bytes(0, count_bytes);
        return None;
    }

    let mut all = own_records;
    for k in 1..comm.size() {
        let line_bytes = comm.recv_bytes(k);
        let count_bytes = comm.recv_bytes(k);
        let lines = String::from_utf8(line_bytes).expect("worker output is ASCII");
        let counts: Vec<u32> = count_bytes
            .chunks_exact(4)
            .map(|c| u32::from_le_bytes(c.try_into().unwrap()))
            .collect();

        let mut idx = 0;
        for line in lines.split_inclusive('\n') {
            if line.is_empty() || line == "\n" {
                continue;
            }
            all.push(MisspelledRecord {
                line: line.to_string(),
                candidate_count: counts[idx],
            });
            idx += 1;
        }
    }

    all.sort_by_key(|r| r.candidate_count);
    Some(all)
}

/// Writes the assembled records to `path`, creating the parent directory if
/// it does not already exist.
pub fn write_output(path: &Path, records: &[MisspelledRecord]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut contents = String::new();
    for record in records {
        if record.line == "\n" {
            continue;
        }
        contents.push_str(&record.line);
    }
    fs::write(path, contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collective::World;
    use std::thread;

    #[test]
    fn assemble_preserves_stable_order_on_ties() {
        let world = World::new(3);
        let owned = [
            vec![MisspelledRecord {
                line: "b: x y\n".into(),
                candidate_count: 2,
            }],
            vec![MisspelledRecord {
                line: "a: x\n".into(),
                candidate_count: 1,
            }],
            vec![MisspelledRecord {
                line: "c:\n".into(),
                candidate_count: 0,
            }],
        ];
        let handles: Vec<_> = owned
            .into_iter()
            .enumerate()
            .map(|(rank, records)| {
                let comm = Rank::new(world.clone(), rank);
                thread::spawn(move || assemble(&comm, records))
            })
            .collect();
        let mut result = None;
        for h in handles {
            if let Some(sorted) = h.join().unwrap() {
                result = Some(sorted);
            }
        }
        let sorted = result.unwrap();
        let lines: Vec<&str> = sorted.iter().map(|r| r.line.as_str()).collect();
        assert_eq!(lines, vec!["c:\n", "a: x\n", "b: x y\n"]);
    }

    #[test]
    fn write_output_creates_parent_dir_and_skips_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.txt");
        let records = vec![
            MisspelledRecord {
                line: "aple: apple\n".into(),
                candidate_count: 1,
            },
            MisspelledRecord {
                line: "\n".into(),
                candidate_count: 0,
            },
        ];
        write_output(&path, &records).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "aple: apple\n");
    }
}
