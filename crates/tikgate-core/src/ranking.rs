// ── Top-consumer ranking ──

use serde::Serialize;

use crate::config::RankSide;
use crate::model::{CounterPair, Queue};
use crate::names::NameMap;

/// Number of entries in the top-consumers report.
pub const TOP_LIMIT: usize = 5;

/// One row of the ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ranked {
    pub name: String,
    pub bytes: u64,
    pub rate: Option<CounterPair>,
}

/// Rank queues by one side of their byte counters, highest first.
///
/// Queues without parsable counters are left out. Ties keep device order
/// (the sort is stable). At most `limit` rows are returned.
pub fn rank_queues(queues: &[Queue], names: &NameMap, side: RankSide, limit: usize) -> Vec<Ranked> {
    let mut ranked: Vec<Ranked> = queues
        .iter()
        .filter_map(|queue| {
            let bytes = queue.bytes?.side(side);
            Some(Ranked {
                name: names.resolve(queue.target.as_deref(), &queue.name),
                bytes,
                rate: queue.rate,
            })
        })
        .collect();

    ranked.sort_by(|a, b| b.bytes.cmp(&a.bytes));
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn queue(name: &str, bytes: Option<&str>) -> Queue {
        Queue {
            name: name.into(),
            target: None,
            rate: None,
            bytes: bytes.and_then(CounterPair::parse),
        }
    }

    fn names(ranked: &[Ranked]) -> Vec<&str> {
        ranked.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn sorts_descending_and_keeps_tie_order() {
        let queues = [
            queue("A", Some("0/100")),
            queue("B", Some("0/200")),
            queue("C", Some("0/200")),
            queue("D", Some("0/50")),
        ];
        let ranked = rank_queues(&queues, &NameMap::default(), RankSide::Download, TOP_LIMIT);
        assert_eq!(names(&ranked), ["B", "C", "A", "D"]);
    }

    #[test]
    fn drops_unparsable_and_truncates() {
        let mut queues: Vec<Queue> = (0..8)
            .map(|i| queue(&format!("q{i}"), Some(format!("0/{i}").as_str())))
            .collect();
        queues.push(queue("broken", Some("n/a")));
        queues.push(queue("missing", None));

        let ranked = rank_queues(&queues, &NameMap::default(), RankSide::Download, TOP_LIMIT);
        assert_eq!(names(&ranked), ["q7", "q6", "q5", "q4", "q3"]);
    }

    #[test]
    fn upload_side_ranks_first_counter() {
        let queues = [queue("up", Some("900/1")), queue("down", Some("1/900"))];
        let ranked = rank_queues(&queues, &NameMap::default(), RankSide::Upload, TOP_LIMIT);
        assert_eq!(names(&ranked), ["up", "down"]);
        assert_eq!(ranked[0].bytes, 900);
    }
}
