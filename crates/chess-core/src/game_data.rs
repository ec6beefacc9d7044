use serde::{Deserialize, Serialize};

/// Header view of a parsed game. Missing Seven Tag Roster entries keep the
/// PGN placeholder values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameMetadata {
    pub event: String,
    pub site: String,
    pub date: String,
    pub round: String,
    pub white: String,
    pub black: String,
    pub result: String, // "1-0", "0-1", "1/2-1/2", "*"
    pub fen: Option<String>,
}

impl Default for GameMetadata {
    fn default() -> Self {
        Self {
            event: "?".to_string(),
            site: "?".to_string(),
            date: "????.??.??".to_string(),
            round: "?".to_string(),
            white: "?".to_string(),
            black: "?".to_string(),
            result: "*".to_string(),
            fen: None,
        }
    }
}

impl GameMetadata {
    /// Apply a raw header tag. Unknown tags are ignored.
    pub fn set_tag(&mut self, name: &str, value: String) {
        match name {
            "Event" => self.event = value,
            "Site" => self.site = value,
            "Date" => self.date = value,
            "Round" => self.round = value,
            "White" => self.white = value,
            "Black" => self.black = value,
            "Result" => self.result = value,
            "FEN" => self.fen = Some(value),
            _ => {}
        }
    }

    /// Tags in Seven Tag Roster order.
    pub fn roster(&self) -> [(&'static str, &str); 7] {
        [
            ("Event", &self.event),
            ("Site", &self.site),
            ("Date", &self.date),
            ("Round", &self.round),
            ("White", &self.white),
            ("Black", &self.black),
            ("Result", &self.result),
        ]
    }
}
