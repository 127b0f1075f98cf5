use std::env;
use std::fs;

use apex_rating::config::Config;
use apex_rating::diagnostics;
use apex_rating::ingest;
use apex_rating::report;
use apex_rating::simulate;
use apex_rating::store::{self, EventKey, Store};

fn simulated_store(seasons: &[i32], rounds: u32) -> Store {
    let config = Config::default();
    let mut store = Store::new();
    for &season in seasons {
        let events = simulate::simulate_season(season, rounds);
        ingest::ingest_events(&mut store, &events, &config).unwrap();
    }
    store
}

#[test]
fn test_simulated_season_persists_and_reloads() {
    let path = env::temp_dir().join("apex_rating_pipeline_store.json");
    let _ = fs::remove_file(&path);

    let store = simulated_store(&[2023], 8);
    store::save_store(&path, &store).unwrap();
    let loaded = store::load_store(&path).unwrap();
    assert_eq!(loaded, store);
    assert_eq!(loaded.events.len(), 8);
    assert_eq!(loaded.drivers.len(), 160);
    assert_eq!(loaded.teams.len(), 80);

    // Team aliases are applied on the way in
    assert!(loaded.teams.iter().any(|t| t.team == "Racing Bulls"));
    assert!(loaded.teams.iter().all(|t| t.team != "RB"));

    let _ = fs::remove_file(&path);
}

#[test]
fn test_every_event_score_in_range() {
    let store = simulated_store(&[2023], 10);
    assert!(store
        .drivers
        .iter()
        .all(|d| (0.0..=10.0).contains(&d.points)));

    // Round 5 and 10 are wet: WA present for every driver
    let wet = EventKey::new(2023, 5).unwrap();
    assert!(store.drivers_for(wet).iter().all(|d| d.components.wa.is_some()));
    let dry = EventKey::new(2023, 4).unwrap();
    assert!(store.drivers_for(dry).iter().all(|d| d.components.wa.is_none()));
}

#[test]
fn test_season_standings_and_timeline() {
    let store = simulated_store(&[2023], 8);
    let season = report::season_report(&store, 2023).unwrap();

    assert_eq!(season.season_rounds, 8);
    assert_eq!(season.drivers.len(), 20);
    assert_eq!(season.teams.len(), 10);

    for timeline in &season.driver_timelines {
        let counted: Vec<u32> = timeline.points.iter().map(|p| p.rounds_counted).collect();
        assert_eq!(counted, (1..=8).collect::<Vec<u32>>());
        let last = timeline.points.last().unwrap();
        assert!(last.scaled >= 0.0 && last.scaled <= 100.0);
    }

    // Everyone ran every round, so the per-driver value equals the season cap
    for standing in &season.drivers {
        assert!((standing.scaled - standing.season_cap).abs() < 1e-6);
        assert_eq!(standing.events, 8);
    }

    for pair in season.drivers.windows(2) {
        assert!(pair[0].scaled >= pair[1].scaled);
    }
}

#[test]
fn test_history_across_seasons() {
    let store = simulated_store(&[2022, 2023], 4);
    let config = Config::default();

    let drivers = report::driver_history(&store, &config.shrinkage);
    assert_eq!(drivers.rows.len(), 20);
    assert!(drivers.prior.k > 0.0);
    for row in &drivers.rows {
        assert_eq!(row.events, 8);
        // Shrinkage never moves a mean past the population mean
        let lo = row.mean.min(drivers.prior.mu) - 1e-3;
        let hi = row.mean.max(drivers.prior.mu) + 1e-3;
        assert!(row.shrunk_mean >= lo && row.shrunk_mean <= hi);
    }
    let verstappen = drivers
        .rows
        .iter()
        .find(|r| r.driver == "Max Verstappen")
        .unwrap();
    assert_eq!(verstappen.teams_years, "Red Bull Racing (2022-2023)");

    let teams = report::team_history(&store, &config.shrinkage);
    assert_eq!(teams.rows.len(), 10);
    let rbr = teams.rows.iter().find(|r| r.team == "Red Bull Racing").unwrap();
    assert_eq!(rbr.years, "2022-2023");

    let best = report::best_seasons_drivers(&store).unwrap();
    assert_eq!(best.len(), 20);
    let podiums: usize = best
        .iter()
        .map(|b| b.first.count() + b.second.count() + b.third.count())
        .sum();
    assert_eq!(podiums, 6);
}

#[test]
fn test_diagnostics_on_simulated_store() {
    let store = simulated_store(&[2023], 3);
    let checks = diagnostics::validate_latest_event(&store);
    assert!(diagnostics::all_passed(&checks));

    let coverage = diagnostics::coverage_report(&store);
    assert_eq!(coverage.len(), 1);
    assert_eq!(coverage[0].with_results, 3);
    assert!(coverage[0].missing.is_empty());

    let latest = report::event_report(&store, None).unwrap();
    assert_eq!(latest.event.key, EventKey::new(2023, 3).unwrap());
    assert_eq!(latest.drivers.len(), 20);
    assert!(latest.drivers[0].points >= latest.drivers[19].points);
}
