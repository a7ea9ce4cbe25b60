use bankroll_sim::prelude::*;
use bankroll_sim::stats::BankrollStats;

fn simulator(builder: &mut SimulatorConfigBuilder) -> BlackjackSimulator {
    BlackjackSimulator::new(builder.build().unwrap())
}

#[test]
fn house_keeps_an_edge_over_many_sessions() {
    let run = simulator(
        SimulatorConfig::new()
            .num_simulations(4000)
            .num_hands_per_session(100)
            .initial_balance(1000.0)
            .bet_amount(50.0),
    )
    .run_with_seed(2023)
    .unwrap();
    let stats = BankrollStats::from_results(&run.results).unwrap();
    assert_eq!(stats.sessions, 4000);
    assert!(stats.mean_final_bankroll < 1000.0);
    assert!(stats.average_winnings_per_hand(1000.0) < 0.0);
}

#[test]
fn continuous_shoe_never_runs_out() {
    for decks in [1, 2, 6, 8] {
        let run = simulator(
            SimulatorConfig::new()
                .num_decks(decks)
                .shuffle_option(ShuffleOption::Continuous)
                .num_simulations(20)
                .num_hands_per_session(2000)
                .initial_balance(1_000_000.0)
                .bet_amount(1.0),
        )
        .run_with_seed(decks as u64);
        let run = run.unwrap();
        assert!(run.results.iter().all(|r| r.hands_played == 2000));
    }
}

#[test]
fn shallow_penetration_is_still_safe() {
    let run = simulator(
        SimulatorConfig::new()
            .num_decks(1)
            .shuffle_option(ShuffleOption::Continuous)
            .penetration_threshold(20)
            .num_simulations(50)
            .num_hands_per_session(500)
            .initial_balance(100_000.0)
            .bet_amount(1.0),
    )
    .run_with_seed(77)
    .unwrap();
    assert_eq!(run.results.len(), 50);
}

#[test]
fn early_endings_only_follow_ruin() {
    let run = simulator(
        SimulatorConfig::new()
            .num_simulations(500)
            .num_hands_per_session(200)
            .initial_balance(100.0)
            .bet_amount(50.0),
    )
    .run_with_seed(9)
    .unwrap();

    let mut early = 0;
    for result in &run.results {
        assert_eq!(
            result.wins + result.losses + result.pushes,
            result.hands_played
        );
        if result.ended_early {
            early += 1;
            assert!(result.hands_played < 200);
            assert!(result.final_bankroll <= 0.0);
        } else {
            assert!(result.hands_played == 200 || result.final_bankroll <= 0.0);
        }
    }
    // two straight losses are enough to end a session
    assert!(early > 0);
}

#[test]
fn every_total_and_up_card_has_a_decision() {
    for total in 4..=21u8 {
        for up_card in 2..=11u8 {
            assert!(
                strategy::lookup_total(total, up_card).is_some(),
                "no decision for {total} against {up_card}"
            );
        }
    }
}

#[test]
fn same_seed_same_report() {
    let config = SimulatorConfig::new()
        .num_simulations(200)
        .num_hands_per_session(50)
        .seed(31337)
        .build()
        .unwrap();
    let first = BlackjackSimulator::new(config.clone()).run().unwrap();
    let second = BlackjackSimulator::new(config).run().unwrap();
    assert_eq!(first, second);
}
