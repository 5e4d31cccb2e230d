//! The Distributed Coordinator (§4.2): N rounds of broadcast + local check +
//! allreduce + candidate exchange.

use std::rc::Rc;

use log::{error, info};

use crate::collective::Rank;
use crate::symspell::DeletionIndex;

/// Everything one worker thread needs to participate in every round: its
/// own shard of the dictionary (already indexed) and its own shard of the
/// query list.
pub struct WorkerContext {
    pub index: DeletionIndex,
    pub query_words: Vec<String>,
}

/// One misspelled line produced by whichever rank owned the round in which
/// the word was broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MisspelledRecord {
    /// Fully formatted, newline-terminated output line, e.g. `"aple: apple\n"`.
    pub line: String,
    pub candidate_count: u32,
}

/// NUL-joins `words`, returning the concatenated bytes and their
/// individual byte lengths (mirroring `word_list.data`/`word_list.lengths`
/// in §3).
fn encode_words(words: &[String]) -> (Vec<u8>, Vec<i32>) {
    let mut data = Vec::new();
    let mut lens = Vec::with_capacity(words.len());
    for w in words {
        data.extend_from_slice(w.as_bytes());
        data.push(0);
        lens.push(w.len() as i32);
    }
    (data, lens)
}

fn decode_words(data: &[u8], lens: &[i32]) -> Vec<String> {
    let mut out = Vec::with_capacity(lens.len());
    let mut cursor = 0usize;
    for &len in lens {
        let len = len as usize;
        let word = std::str::from_utf8(&data[cursor..cursor + len])
            .expect("broadcast word is not valid ASCII/UTF-8")
            .to_string();
        out.push(word);
        cursor += len + 1;
    }
    out
}

/// Runs one round of the protocol: worker `owner`'s query shard is
/// broadcast, checked against every worker's dictionary shard, and
/// misspelled words' candidates are gathered back to `owner`.
///
/// Returns the records this call produced: non-empty only when
/// `comm.rank() == owner`.
pub fn run_round(comm: &Rank, owner: usize, ctx: &WorkerContext) -> Vec<MisspelledRecord> {
    let is_owner = comm.rank() == owner;

    let (data, lens) = if is_owner {
        encode_words(&ctx.query_words)
    } else {
        (Vec::new(), Vec::new())
    };
    let data = comm.broadcast_bytes(owner, is_owner.then_some(data));
    let lens = comm.broadcast_ints(owner, is_owner.then_some(lens));
    let words = decode_words(&data, &lens);
    let m = words.len();

    let local_hit: Vec<bool> = words.iter().map(|w| ctx.index.check(w)).collect();
    let global_hit = comm.allreduce_or(local_hit);

    let mut local_candidates: Vec<Vec<Rc<str>>> = vec![Vec::new(); m];
    let mut local_byte_row = vec![0u32; m];
    for j in 0..m {
        if !global_hit[j] {
            if ctx.index.check(&words[j]) {
                error!(
                    "rank {}: invariant violation: candidates() precondition failed for {:?}",
                    comm.rank(),
                    words[j]
                );
            }
            let cands = ctx.index.candidates(&words[j]);
            let bytes: u32 = cands.iter().map(|c| c.len() as u32 + 1).sum();
            local_byte_row[j] = bytes;
            local_candidates[j] = cands;
        }
    }

    let global_rows = comm.allgather_rows(local_byte_row);

    let mut own_payload = Vec::new();
    for candidates in &local_candidates {
        for c in candidates {
            own_payload.extend_from_slice(c.as_bytes());
            own_payload.push(0);
        }
    }

    if !is_owner {
        comm.send_bytes(owner, own_payload);
        return Vec::new();
    }

    let mut payloads: Vec<Vec<u8>> = vec![Vec::new(); comm.size()];
    payloads[owner] = own_payload;
    for k in 0..comm.size() {
        if k != owner {
            payloads[k] = comm.recv_bytes(k);
        }
    }

    let mut cursors = vec![0usize; comm.size()];
    let mut records = Vec::new();
    for (j, word) in words.iter().enumerate() {
        if global_hit[j] {
            continue;
        }
        let mut candidate_strings: Vec<String> = Vec::new();
        for k in 0..comm.size() {
            let nbytes = global_rows[k][j] as usize;
            if nbytes == 0 {
                continue;
            }
            let slice = &payloads[k][cursors[k]..cursors[k] + nbytes];
            cursors[k] += nbytes;
            for part in slice.split(|&b| b == 0) {
                if !part.is_empty() {
                    candidate_strings
                        .push(String::from_utf8(part.to_vec()).expect("candidate is ASCII"));
                }
            }
        }
        candidate_strings.sort();
        candidate_strings.dedup();

        let line = if candidate_strings.is_empty() {
            format!("{word}:\n")
        } else {
            format!("{word}: {}\n", candidate_strings.join(" "))
        };
        records.push(MisspelledRecord {
            line,
            candidate_count: candidate_strings.len() as u32,
        });
    }
    info!("round owner={owner}: {} misspelled word(s)", records.len());
    records
}
