//! Ranking query: movers ordered by completed missions.

use crate::domain::Mover;

/// Orders `movers` by `missions_completed`, highest first.
///
/// The sort is stable, so ties keep the input order. Fed from `MoverStore::list`,
/// that is mover creation order.
pub fn rank_movers(mut movers: Vec<Mover>, limit: Option<usize>) -> Vec<Mover> {
    movers.sort_by(|a, b| b.missions_completed.cmp(&a.missions_completed));
    if let Some(limit) = limit {
        movers.truncate(limit);
    }
    movers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MoverId, NewMover};
    use rstest::rstest;
    use ulid::Ulid;

    fn mover(name: &str, missions: u64) -> Mover {
        let mut m = NewMover::new(name, 10.0).into_mover(MoverId::from_ulid(Ulid::new()));
        m.missions_completed = missions;
        m
    }

    fn names(movers: &[Mover]) -> Vec<&str> {
        movers.iter().map(|m| m.name.as_str()).collect()
    }

    #[test]
    fn orders_by_missions_descending_with_stable_ties() {
        let movers = vec![mover("a", 1), mover("b", 3), mover("c", 1), mover("d", 3)];

        let ranked = rank_movers(movers, None);

        assert_eq!(names(&ranked), vec!["b", "d", "a", "c"]);
    }

    #[rstest]
    #[case::none(None, 3)]
    #[case::smaller(Some(2), 2)]
    #[case::larger(Some(10), 3)]
    #[case::zero(Some(0), 0)]
    fn limit_truncates(#[case] limit: Option<usize>, #[case] expected: usize) {
        let movers = vec![mover("a", 0), mover("b", 2), mover("c", 1)];
        assert_eq!(rank_movers(movers, limit).len(), expected);
    }

    #[test]
    fn empty_fleet_ranks_empty() {
        assert!(rank_movers(Vec::new(), None).is_empty());
    }
}
