use std::collections::{BTreeMap, BTreeSet};

/// Compress years into ranges: `[2019, 2020, 2021, 2023]` -> `"2019-2021, 2023"`.
/// Duplicates and ordering are ignored.
pub fn compress_years<I>(years: I) -> String
where
    I: IntoIterator<Item = i32>,
{
    let years: BTreeSet<i32> = years.into_iter().collect();
    let mut ranges: Vec<(i32, i32)> = Vec::new();

    for y in years {
        match ranges.last_mut() {
            Some((_, end)) if *end + 1 == y => *end = y,
            _ => ranges.push((y, y)),
        }
    }

    ranges
        .iter()
        .map(|&(a, b)| {
            if a == b {
                a.to_string()
            } else {
                format!("{}-{}", a, b)
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Summarise `(team, year)` pairs as `"Team (2019-2021, 2023); Other (2022)"`,
/// teams ordered by their first year.
pub fn teams_and_years<'a, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, i32)>,
{
    let mut by_team: BTreeMap<&str, BTreeSet<i32>> = BTreeMap::new();
    for (team, year) in pairs {
        by_team.entry(team).or_default().insert(year);
    }

    let mut teams: Vec<(&str, BTreeSet<i32>)> = by_team.into_iter().collect();
    teams.sort_by_key(|(team, years)| (years.first().copied(), *team));

    teams
        .into_iter()
        .map(|(team, years)| format!("{} ({})", team, compress_years(years)))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compress_years() {
        assert_eq!(compress_years([2019, 2020, 2021, 2023]), "2019-2021, 2023");
        assert_eq!(compress_years([2023, 2019, 2021, 2020, 2021]), "2019-2021, 2023");
        assert_eq!(compress_years([2010]), "2010");
        assert_eq!(compress_years([2010, 2012, 2014]), "2010, 2012, 2014");
        assert_eq!(compress_years(Vec::new()), "");
    }

    #[test]
    fn test_teams_and_years() {
        let pairs = vec![
            ("Team", 2019),
            ("Team", 2020),
            ("Other", 2022),
            ("Team", 2021),
            ("Team", 2023),
            ("Team", 2019),
        ];
        assert_eq!(
            teams_and_years(pairs),
            "Team (2019-2021, 2023); Other (2022)"
        );
    }

    #[test]
    fn test_teams_and_years_empty() {
        assert_eq!(teams_and_years(Vec::new()), "");
    }
}
