//! PGN reading and writing.
//!
//! Reading is a `pgn_reader::Visitor` that replays the mainline of every game
//! in a stream and resolves each SAN token to a legal `shakmaty::Move`.
//! Writing produces Seven Tag Roster headers and SAN movetext wrapped at
//! 80 columns, the layout most PGN tools emit.

use std::io;
use std::ops::ControlFlow;

use pgn_reader::{RawTag, Reader, SanPlus, Skip, Visitor};
use shakmaty::{fen::Fen, san::San, CastlingMode, Chess, Move, Position};
use tracing::warn;

use crate::game_data::GameMetadata;

const LINE_WIDTH: usize = 80;

/// A parsed game: headers, starting position and resolved mainline moves.
#[derive(Debug, Clone)]
pub struct GameRecord {
    pub metadata: GameMetadata,
    pub start: Chess,
    pub moves: Vec<Move>,
}

/// Serialize a game played from the standard starting position.
pub fn write_game(moves: &[Move], metadata: &GameMetadata) -> String {
    let mut out = String::new();
    for (name, value) in metadata.roster() {
        out.push_str(&format!("[{} \"{}\"]\n", name, escape_tag(value)));
    }
    out.push('\n');

    let mut tokens = Vec::with_capacity(moves.len() * 3 / 2 + 1);
    let mut pos = Chess::default();

    for (ply, mv) in moves.iter().enumerate() {
        if ply % 2 == 0 {
            tokens.push(format!("{}.", ply / 2 + 1));
        }
        let san = San::from_move(&pos, mv.clone());
        pos.play_unchecked(mv.clone());
        let suffix = if pos.is_checkmate() {
            "#"
        } else if pos.is_check() {
            "+"
        } else {
            ""
        };
        tokens.push(format!("{san}{suffix}"));
    }
    tokens.push(metadata.result.clone());

    let mut line_len = 0;
    for token in tokens {
        if line_len > 0 && line_len + 1 + token.len() > LINE_WIDTH {
            out.push('\n');
            line_len = 0;
        } else if line_len > 0 {
            out.push(' ');
            line_len += 1;
        }
        line_len += token.len();
        out.push_str(&token);
    }
    out.push('\n');
    out
}

fn escape_tag(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Parse every game in a PGN text stream, in order.
pub fn read_games(pgn: &str) -> io::Result<Vec<GameRecord>> {
    let mut reader = Reader::new(pgn.as_bytes());
    let mut collector = GameCollector { games_seen: 0 };
    let mut games = Vec::new();

    while let Some(game) = reader.read_game(&mut collector)? {
        games.push(game);
    }

    Ok(games)
}

/// Visitor state carried through a game's movetext.
struct MovetextState {
    metadata: GameMetadata,
    start: Chess,
    pos: Chess,
    moves: Vec<Move>,
    /// Set once a SAN token fails to resolve; the rest of the mainline is dropped.
    broken: bool,
}

struct GameCollector {
    games_seen: usize,
}

impl GameCollector {
    fn starting_position(&self, metadata: &GameMetadata) -> Option<Chess> {
        let Some(fen) = metadata.fen.as_deref() else {
            return Some(Chess::default());
        };
        let parsed = fen.parse::<Fen>().ok()?;
        parsed.into_position::<Chess>(CastlingMode::Standard).ok()
    }
}

impl Visitor for GameCollector {
    type Tags = GameMetadata;
    type Movetext = MovetextState;
    type Output = GameRecord;

    fn begin_tags(&mut self) -> ControlFlow<Self::Output, Self::Tags> {
        ControlFlow::Continue(GameMetadata::default())
    }

    fn tag(
        &mut self,
        tags: &mut Self::Tags,
        name: &[u8],
        value: RawTag<'_>,
    ) -> ControlFlow<Self::Output> {
        let name = String::from_utf8_lossy(name);
        tags.set_tag(&name, value.decode_utf8_lossy().into_owned());
        ControlFlow::Continue(())
    }

    fn begin_movetext(&mut self, tags: Self::Tags) -> ControlFlow<Self::Output, Self::Movetext> {
        self.games_seen += 1;

        let (start, broken) = match self.starting_position(&tags) {
            Some(pos) => (pos, false),
            None => {
                warn!(game = self.games_seen, "Unreadable FEN header, skipping moves");
                (Chess::default(), true)
            }
        };

        ControlFlow::Continue(MovetextState {
            metadata: tags,
            pos: start.clone(),
            start,
            moves: Vec::new(),
            broken,
        })
    }

    fn san(&mut self, state: &mut Self::Movetext, san_plus: SanPlus) -> ControlFlow<Self::Output> {
        if state.broken {
            return ControlFlow::Continue(());
        }

        match san_plus.san.to_move(&state.pos) {
            Ok(mv) => {
                state.pos.play_unchecked(mv.clone());
                state.moves.push(mv);
            }
            Err(e) => {
                warn!(
                    game = self.games_seen,
                    ply = state.moves.len(),
                    san = %san_plus,
                    error = %e,
                    "Illegal move in PGN, ignoring rest of mainline"
                );
                state.broken = true;
            }
        }

        ControlFlow::Continue(())
    }

    fn begin_variation(&mut self, _state: &mut Self::Movetext) -> ControlFlow<Self::Output, Skip> {
        // Mainline only.
        ControlFlow::Continue(Skip(true))
    }

    fn end_game(&mut self, state: Self::Movetext) -> Self::Output {
        GameRecord {
            metadata: state.metadata,
            start: state.start,
            moves: state.moves,
        }
    }
}
