use super::formatter::{format_number, Column, Table};
use crate::report::{
    BestSeasons, DriverStanding, HistoricalDriver, HistoricalTeam, TeamStanding,
};
use crate::scoring::{Component, ComponentSet, PointsResult};
use crate::season::SeasonTimeline;
use crate::store::{DriverResult, TeamResult};

fn n3(value: f64) -> String {
    format_number(Some(value), 3)
}

fn opt3(value: Option<f64>) -> String {
    format_number(value, 3)
}

fn opt_pos(value: Option<u32>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

fn component_columns() -> impl Iterator<Item = Column> {
    Component::ALL.iter().map(|c| Column::number(c.label()))
}

fn component_cells(set: &ComponentSet) -> impl Iterator<Item = String> + '_ {
    Component::ALL.iter().map(move |c| opt3(set.get(*c)))
}

/// Per-component contributions of an ad-hoc score.
pub fn breakdown_table(result: &PointsResult) -> Table {
    let mut table = Table::new(vec![
        Column::text("Component"),
        Column::number("Value"),
        Column::number("Weight"),
        Column::number("Share"),
    ]);
    for c in &result.breakdown.contributions {
        table.push(vec![
            c.component.label().to_string(),
            n3(c.value),
            format_number(Some(c.weight), 2),
            format!("{:.1}%", c.share * 100.0),
        ]);
    }
    table
}

pub fn event_drivers_table(rows: &[DriverResult]) -> Table {
    let mut columns = vec![
        Column::name("Driver"),
        Column::text("Team"),
        Column::number("Grid"),
        Column::number("Finish"),
    ];
    columns.extend(component_columns());
    columns.extend([Column::number("PF"), Column::number("CSI"), Column::number("Points")]);

    let mut table = Table::new(columns);
    for r in rows {
        let mut cells = vec![
            r.driver.clone(),
            r.team.clone(),
            opt_pos(r.grid),
            opt_pos(r.finish),
        ];
        cells.extend(component_cells(&r.components));
        cells.extend([format_number(Some(r.pf), 2), n3(r.csi), n3(r.points)]);
        table.push(cells);
    }
    table
}

pub fn event_teams_table(rows: &[TeamResult]) -> Table {
    let mut table = Table::new(vec![
        Column::name("Team"),
        Column::number("Grid"),
        Column::number("Finish"),
        Column::number("CSI"),
        Column::number("Ops"),
        Column::number("Rel"),
        Column::number("Dev"),
        Column::number("Points"),
    ]);
    for r in rows {
        table.push(vec![
            r.team.clone(),
            format_number(r.grid_mean, 2),
            format_number(r.finish_mean, 2),
            n3(r.csi_mean),
            format_number(Some(r.ops), 2),
            format_number(Some(r.reliability), 2),
            format_number(Some(r.development), 2),
            n3(r.points),
        ]);
    }
    table
}

pub fn season_drivers_table(rows: &[DriverStanding]) -> Table {
    let mut columns = vec![
        Column::name("Driver"),
        Column::text("Team"),
        Column::number("Events"),
        Column::number("Grid"),
        Column::number("Finish"),
        Column::number("CSI"),
    ];
    columns.extend(component_columns());
    columns.extend([
        Column::number("PF"),
        Column::number("Total"),
        Column::number("0-100"),
        Column::number("Cap"),
    ]);

    let mut table = Table::new(columns);
    for r in rows {
        let mut cells = vec![
            r.driver.clone(),
            r.teams.join(" / "),
            r.events.to_string(),
            format_number(r.grid_mean, 2),
            format_number(r.finish_mean, 2),
            opt3(r.csi_mean),
        ];
        cells.extend(component_cells(&r.components));
        cells.extend([
            format_number(r.pf_mean, 2),
            n3(r.total),
            n3(r.scaled),
            n3(r.season_cap),
        ]);
        table.push(cells);
    }
    table
}

pub fn season_teams_table(rows: &[TeamStanding]) -> Table {
    let mut table = Table::new(vec![
        Column::name("Team"),
        Column::number("Events"),
        Column::number("Grid"),
        Column::number("Finish"),
        Column::number("CSI"),
        Column::number("Ops"),
        Column::number("Rel"),
        Column::number("Dev"),
        Column::number("Total"),
        Column::number("0-100"),
        Column::number("Cap"),
    ]);
    for r in rows {
        table.push(vec![
            r.team.clone(),
            r.events.to_string(),
            format_number(r.grid_mean, 2),
            format_number(r.finish_mean, 2),
            opt3(r.csi_mean),
            format_number(r.ops, 2),
            format_number(r.reliability, 2),
            format_number(r.development, 2),
            n3(r.total),
            n3(r.scaled),
            n3(r.season_cap),
        ]);
    }
    table
}

/// One row per participant per round.
pub fn timeline_table(timelines: &[SeasonTimeline<String>], header: &'static str) -> Table {
    let mut table = Table::new(vec![
        Column::name(header),
        Column::number("Round"),
        Column::number("Points"),
        Column::number("Cumulative"),
        Column::number("Counted"),
        Column::number("0-100"),
    ]);
    for t in timelines {
        for p in &t.points {
            table.push(vec![
                t.participant.clone(),
                p.round.to_string(),
                n3(p.points),
                n3(p.cumulative),
                p.rounds_counted.to_string(),
                n3(p.scaled),
            ]);
        }
    }
    table
}

pub fn history_drivers_table(rows: &[HistoricalDriver]) -> Table {
    let mut columns = vec![
        Column::text("Driver"),
        Column::name("Teams and years"),
        Column::number("Events"),
        Column::number("Grid"),
        Column::number("Finish"),
        Column::number("CSI"),
    ];
    columns.extend(component_columns());
    columns.extend([
        Column::number("Total"),
        Column::number("Mean"),
        Column::number("EB mean"),
    ]);

    let mut table = Table::new(columns);
    for r in rows {
        let mut cells = vec![
            r.driver.clone(),
            r.teams_years.clone(),
            r.events.to_string(),
            format_number(r.grid_mean, 2),
            format_number(r.finish_mean, 2),
            opt3(r.csi_mean),
        ];
        cells.extend(component_cells(&r.components));
        cells.extend([n3(r.total), n3(r.mean), n3(r.shrunk_mean)]);
        table.push(cells);
    }
    table
}

pub fn history_teams_table(rows: &[HistoricalTeam]) -> Table {
    let mut table = Table::new(vec![
        Column::text("Team"),
        Column::name("Years"),
        Column::number("Events"),
        Column::number("CSI"),
        Column::number("Ops"),
        Column::number("Rel"),
        Column::number("Dev"),
        Column::number("Total"),
        Column::number("Mean"),
        Column::number("EB mean"),
    ]);
    for r in rows {
        table.push(vec![
            r.team.clone(),
            r.years.clone(),
            r.events.to_string(),
            opt3(r.csi_mean),
            format_number(r.ops, 2),
            format_number(r.reliability, 2),
            format_number(r.development, 2),
            n3(r.total),
            n3(r.mean),
            n3(r.shrunk_mean),
        ]);
    }
    table
}

pub fn best_seasons_table(rows: &[BestSeasons]) -> Table {
    let with_teams = rows.iter().any(|r| r.teams_years.is_some());

    let mut columns = vec![Column::text("Name")];
    if with_teams {
        columns.push(Column::name("Teams and years"));
    }
    columns.extend([
        Column::number("Events/season"),
        Column::number("Seasons"),
        Column::text("1st"),
        Column::text("2nd"),
        Column::text("3rd"),
        Column::number("Mean 0-100"),
    ]);

    let mut table = Table::new(columns);
    for r in rows {
        let mut cells = vec![r.name.clone()];
        if with_teams {
            cells.push(r.teams_years.clone().unwrap_or_default());
        }
        cells.extend([
            format_number(Some(r.events_per_season), 2),
            r.seasons.to_string(),
            r.first.to_string(),
            r.second.to_string(),
            r.third.to_string(),
            n3(r.mean_scaled),
        ]);
        table.push(cells);
    }
    table
}
