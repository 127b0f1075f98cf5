use std::collections::HashMap;

use crate::config::NamingConfig;

const BUILTIN_TEAM_ALIASES: &[(&str, &str)] = &[
    ("red bull", "Red Bull Racing"),
    ("red bull racing", "Red Bull Racing"),
    ("rb", "Racing Bulls"),
    ("scuderia alphatauri", "Racing Bulls"),
    ("alphatauri", "Racing Bulls"),
    ("toro rosso", "Racing Bulls"),
    ("mclaren", "McLaren"),
    ("mercedes", "Mercedes"),
    ("ferrari", "Ferrari"),
    ("aston martin", "Aston Martin"),
    ("alpine", "Alpine"),
    ("renault", "Renault"),
    ("benetton", "Benetton"),
    ("williams", "Williams"),
    ("sauber", "Sauber"),
    ("stake", "Sauber"),
    ("alfa romeo", "Sauber"),
    ("haas", "Haas F1 Team"),
    ("racing point", "Aston Martin"),
    ("force india", "Aston Martin"),
    ("jordan", "Aston Martin"),
];

/// Trim and collapse internal whitespace runs to one space.
pub fn clean_name(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Maps team name variants onto one canonical name per constructor lineage.
///
/// Lookup is case-insensitive after whitespace cleanup. Configured aliases
/// override the built-in ones.
#[derive(Debug, Clone)]
pub struct TeamNames {
    aliases: HashMap<String, String>,
}

impl Default for TeamNames {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TeamNames {
    pub fn builtin() -> Self {
        let aliases = BUILTIN_TEAM_ALIASES
            .iter()
            .map(|(alias, canonical)| (alias.to_string(), canonical.to_string()))
            .collect();
        Self { aliases }
    }

    pub fn from_config(config: &NamingConfig) -> Self {
        let mut names = Self::builtin();
        for (alias, canonical) in &config.teams {
            names
                .aliases
                .insert(clean_name(alias).to_lowercase(), clean_name(canonical));
        }
        names
    }

    /// Canonical team name; unknown names come back cleaned but otherwise as given.
    pub fn canonical(&self, name: &str) -> String {
        let cleaned = clean_name(name);
        match self.aliases.get(&cleaned.to_lowercase()) {
            Some(canonical) => canonical.clone(),
            None => cleaned,
        }
    }
}
