//! Log line classification
//!
//! A raw log line maps to at most one recognized token. Three fixed patterns
//! are supported; everything else is silently ignored. The patterns are
//! mutually exclusive by construction, so the order they are tried in does
//! not affect the result.

use std::collections::HashMap;

use regex::Regex;

const OUTFIT_PATTERN: &str = "LogCustomization: --> ([a-zA-Z0-9]+)_[a-zA-Z0-9]+";
const KILLER_ANNOUNCE_PATTERN: &str = "MatchMembersA=\\[\"([0-9a-f\\-]+)\"\\]";
const PLAYER_ADDED_PATTERN: &str =
    "AddSessionPlayer Session:GameSession PlayerId:([0-9a-f\\-]+)\\|([0-9]+)";

/// Killer character names and the outfit codes that identify them in
/// customization log lines. Codes are disjoint across characters.
const CHARACTER_OUTFIT_CODES: &[(&str, &[&str])] = &[
    ("Cannibal", &["CA"]),
    ("Clown", &["GK", "Clown"]),
    ("Demogorgon", &["QK"]),
    ("Doctor", &["DO", "DOW04", "Killer07"]),
    ("Ghostface", &["OK"]),
    ("Hag", &["HA", "WI", "Witch"]),
    ("Hillbilly", &["HB", "TC", "Hillbilly"]),
    ("Huntress", &["BE"]),
    ("Legion", &["KK", "Legion"]),
    ("Nightmare", &["SD"]),
    ("Nurse", &["TN", "Nurse", "NR"]),
    ("Pig", &["FK"]),
    ("Plague", &["ML", "MK", "Plague"]),
    ("Shape", &["MM"]),
    ("Spirit", &["HK", "Spirit"]),
    ("Trapper", &["TR", "TRW03", "TRW04", "Chuckles", "S01", "Trapper"]),
    ("Wraith", &["TW", "WR", "Wraith"]),
];

/// Immutable mapping from outfit code to killer character name
#[derive(Debug)]
pub struct OutfitCodeTable {
    code_to_character: HashMap<&'static str, &'static str>,
}

impl OutfitCodeTable {
    pub fn new() -> Self {
        let mut code_to_character = HashMap::new();
        for (character, codes) in CHARACTER_OUTFIT_CODES {
            for code in *codes {
                code_to_character.insert(*code, *character);
            }
        }
        Self { code_to_character }
    }

    /// Character name for an outfit code, if recognized
    pub fn character_for_code(&self, code: &str) -> Option<&'static str> {
        self.code_to_character.get(code).copied()
    }

    /// All (code, character) pairs, for exhaustive tests
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.code_to_character.iter().map(|(c, n)| (*c, *n))
    }
}

impl Default for OutfitCodeTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Structured token extracted from one log line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEvent {
    /// Outfit customization for a recognized killer character
    OutfitSelected { character: String },
    /// Lobby membership announcement naming the killer's session id
    KillerAnnounced { session_id: String },
    /// A participant joined the lobby with (session id, platform id)
    PlayerAdded {
        session_id: String,
        persistent_id: String,
    },
}

/// Stateless line-to-token mapper. The regexes and outfit table are built
/// once at construction and shared by reference.
pub struct LineClassifier {
    outfit_re: Regex,
    killer_announce_re: Regex,
    player_added_re: Regex,
    outfit_codes: OutfitCodeTable,
}

impl LineClassifier {
    pub fn new() -> Self {
        Self {
            // the patterns are fixed literals; compilation cannot fail
            outfit_re: Regex::new(OUTFIT_PATTERN).unwrap(),
            killer_announce_re: Regex::new(KILLER_ANNOUNCE_PATTERN).unwrap(),
            player_added_re: Regex::new(PLAYER_ADDED_PATTERN).unwrap(),
            outfit_codes: OutfitCodeTable::new(),
        }
    }

    /// Classify one raw line. Unmatched lines and outfit lines with an
    /// unrecognized code yield `None`; neither is an error.
    pub fn classify(&self, line: &str) -> Option<LineEvent> {
        if let Some(caps) = self.outfit_re.captures(line) {
            let code = &caps[1];
            return self
                .outfit_codes
                .character_for_code(code)
                .map(|character| LineEvent::OutfitSelected {
                    character: character.to_string(),
                });
        }

        if let Some(caps) = self.killer_announce_re.captures(line) {
            return Some(LineEvent::KillerAnnounced {
                session_id: caps[1].to_string(),
            });
        }

        if let Some(caps) = self.player_added_re.captures(line) {
            return Some(LineEvent::PlayerAdded {
                session_id: caps[1].to_string(),
                persistent_id: caps[2].to_string(),
            });
        }

        None
    }

    pub fn outfit_codes(&self) -> &OutfitCodeTable {
        &self.outfit_codes
    }
}

impl Default for LineClassifier {
    fn default() -> Self {
        Self::new()
    }
}
