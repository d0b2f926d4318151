// Integration tests for the ReCom chain:
//   contiguity and population bounds of every emitted state, incremental updater
//   consistency, exact step counts, and seeded reproducibility.

mod common;

use std::collections::BTreeMap;

use recomchain::{
    Acceptance, Constraint, Constraints, Election, Error, MarkovChain, Partition, Recom, Updater, Updaters,
    chain::StepOutcome,
    summary::{Ensemble, Summarizer},
};

use common::{column_grid, graph_from_rows};

fn grid_chain(total_steps: usize, seed: u64) -> MarkovChain<Recom> {
    let graph = column_grid(6, 4, |r, c| ((r + c) % 4) as i64 * 2);
    let updaters = Updaters::new()
        .with("population", Updater::tally("TOTPOP"))
        .with("pres", Updater::election(Election::new("pres", [("Dem", "PRES16D"), ("Rep", "PRES16R")])))
        .with("bvap", Updater::share("BVAP", "VAP"));
    let initial = Partition::from_attribute(graph, "CONG_DIST", updaters).unwrap();
    let ideal = initial.ideal_population("population").unwrap();

    let constraints = Constraints::new()
        .with(Constraint::within_percent_of_ideal(&initial, "population", 0.25).unwrap())
        .with(Constraint::Contiguous);
    let recom = Recom::new("TOTPOP", ideal, 0.25, 2).unwrap();
    MarkovChain::new(recom, constraints, Acceptance::Always, initial, total_steps, seed).unwrap()
}

#[test]
fn every_state_is_contiguous_and_balanced() {
    let mut accepted = 0;
    let mut previous: Option<Partition> = None;
    for state in grid_chain(200, 11) {
        assert!(state.is_contiguous());
        assert!(state.max_deviation("population").unwrap() <= 0.25 + 1e-12);
        if previous.as_ref().is_some_and(|p| p.assignments() != state.assignments()) { accepted += 1 }
        previous = Some(state);
    }
    assert!(accepted > 0, "chain never moved");
}

#[test]
fn incremental_updaters_match_full_recomputation() {
    for state in grid_chain(100, 5) {
        let fresh = state.recomputed();
        assert_eq!(state.cut_edges(), fresh.cut_edges());
        assert_eq!(state.tally("population"), fresh.tally("population"));

        let (a, b) = (state.election("pres").unwrap(), fresh.election("pres").unwrap());
        for party in ["Dem", "Rep"] {
            assert_eq!(a.totals(party), b.totals(party));
        }
    }
}

#[test]
fn emits_exactly_total_steps_even_when_proposals_fail() {
    // A budget of one tree with a tight tolerance exhausts often.
    let graph = column_grid(6, 4, |_, _| 0);
    let updaters = Updaters::new().with("population", Updater::tally("TOTPOP"));
    let initial = Partition::from_attribute(graph, "CONG_DIST", updaters).unwrap();
    let constraints = Constraints::new().with(Constraint::within_percent_of_ideal(&initial, "population", 0.01).unwrap());
    let recom = Recom::new("TOTPOP", 40.0, 0.01, 1).unwrap();
    let chain = MarkovChain::new(recom, constraints, Acceptance::Always, initial, 120, 3).unwrap();

    let mut outcomes = Vec::new();
    let final_state = chain.run(&mut |_: usize, _: &Partition, outcome: StepOutcome| outcomes.push(outcome));
    assert_eq!(outcomes.len(), 120);
    assert!(outcomes.iter().any(|o| *o != StepOutcome::Accepted));
    assert!(final_state.is_contiguous());
}

#[test]
fn same_seed_reproduces_the_chain() {
    let run = |seed| grid_chain(60, seed).map(|p| p.assignments().to_vec()).collect::<Vec<_>>();
    assert_eq!(run(21), run(21));
}

#[test]
fn line_of_four_only_splits_in_the_middle() {
    let rows = (0..4)
        .map(|i| BTreeMap::from([("TOTPOP".to_string(), 10), ("CD".to_string(), (i / 2) as i64)]))
        .collect();
    let graph = graph_from_rows(rows, &[(0, 1), (1, 2), (2, 3)]);
    let updaters = Updaters::new().with("population", Updater::tally("TOTPOP"));
    let initial = Partition::from_attribute(graph, "CD", updaters).unwrap();
    assert_eq!(initial.ideal_population("population"), Some(20.0));

    let constraints = Constraints::new().with(Constraint::within_percent_of_ideal(&initial, "population", 0.1).unwrap());
    let recom = Recom::new("TOTPOP", 20.0, 0.1, 2).unwrap();
    let chain = MarkovChain::new(recom, constraints, Acceptance::Always, initial, 50, 8).unwrap();

    for state in chain {
        let a = state.assignments();
        assert!(a == [0, 0, 1, 1] || a == [1, 1, 0, 0], "unexpected split {a:?}");
        assert_eq!(state.tally("population"), Some(&[20.0, 20.0][..]));
    }
}

#[test]
fn symmetric_votes_have_no_bias() {
    let rows = (0..4)
        .map(|i| BTreeMap::from([
            ("TOTPOP".to_string(), 10),
            ("D".to_string(), 3 + i as i64),
            ("R".to_string(), 3 + i as i64),
        ]))
        .collect();
    let graph = graph_from_rows(rows, &[(0, 1), (1, 2), (2, 3)]);
    let updaters = Updaters::new().with("e", Updater::election(Election::new("e", [("A", "D"), ("B", "R")])));
    let partition = Partition::new(graph, &[0, 0, 1, 1], updaters).unwrap();
    let results = partition.election("e").unwrap();

    assert_eq!(results.mean_median(), 0.0);
    assert_eq!(results.efficiency_gap(), 0.0);
    assert_eq!(results.wins("A"), 0);
}

#[test]
fn ensemble_records_every_step() {
    let chain = grid_chain(40, 2);
    let summarizer = Summarizer {
        population: Some("population".into()),
        elections: vec!["pres".into()],
        majority: None,
    };
    let mut ensemble = Ensemble::new(summarizer, chain.state(), chain.total_steps()).unwrap();
    chain.run(&mut ensemble);

    assert_eq!(ensemble.len(), 40);
    assert_eq!(ensemble.stats().steps(), 40);
    assert!(ensemble.steps().iter().all(|s| s.populations.len() == 6 && s.elections["pres"].percents.len() == 6));
}

#[test]
fn disconnected_input_is_rejected() {
    let rows = (0..4).map(|_| BTreeMap::from([("TOTPOP".to_string(), 1)])).collect::<Vec<_>>();
    let nodes = rows.into_iter()
        .enumerate()
        .map(|(i, attrs)| recomchain::graph::NodeRecord {
            id: format!("n{i}"),
            attributes: attrs.into_iter().map(|(k, v)| (k, v.into())).collect(),
        })
        .collect();
    let records = recomchain::GraphRecords { nodes, edges: vec![("n0".into(), "n1".into()), ("n2".into(), "n3".into())] };
    assert!(matches!(recomchain::DualGraph::from_records(&records), Err(Error::GraphConstruction { .. })));
}
