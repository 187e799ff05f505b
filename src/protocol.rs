//! JSON line protocol.
//!
//! Each input line is one move request; each output line is one response.
//! This is the boundary the surrounding service talks to, so it accepts the
//! loosely-typed wire shape (strings for marks and difficulty, signed
//! coordinates) and turns every problem into a typed [`EngineError`] with a
//! stable `kind`.
//!
//! ## Request
//!
//! ```text
//! {"id": 7, "board": [["x","",""],["","o",""],["","",""]],
//!  "mark": "x", "difficulty": "hard", "lastMove": {"row": 1, "column": 1}}
//! ```
//!
//! `id`, `mark` and `lastMove` are optional. `id` is echoed back verbatim.
//!
//! ## Response
//!
//! ```text
//! {"id": 7, "ok": true, "winner": null, "region": {...}, "lastMove": {...}, "board": [...]}
//! {"id": 7, "ok": false, "error": {"kind": "UnknownDifficulty", "message": "..."}}
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use nrow_ai::protocol::Server;
//! let mut server = Server::new(nrow_ai::engine::Engine::new());
//! server.run(std::io::stdin().lock(), std::io::stdout())?;
//! ```

use std::io::{self, BufRead, Write};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::board::{Board, Mark, Move, Outcome};
use crate::engine::{Engine, MoveOutcome, settled};
use crate::error::EngineError;
use crate::region::Region;
use crate::strategy::Difficulty;

/// Kind reported for lines that are not valid request JSON.
pub const MALFORMED_REQUEST: &str = "MalformedRequest";

/// A coordinate as it appears on the wire; may be out of range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMove {
    pub row: i64,
    pub column: i64,
}

/// A move request exactly as received.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest {
    #[serde(default)]
    pub id: Option<Value>,
    pub board: Vec<Vec<String>>,
    #[serde(default)]
    pub mark: Option<String>,
    pub difficulty: String,
    #[serde(default)]
    pub last_move: Option<WireMove>,
}

/// A request with every field parsed into engine types.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveQuery {
    pub board: Board,
    pub mark: Option<Mark>,
    pub difficulty: Difficulty,
    pub last_move: Option<Move>,
}

impl MoveRequest {
    /// Parse the wire fields. Bounds against the board are checked by the engine.
    pub fn decode(&self) -> Result<MoveQuery, EngineError> {
        self.decode_with(Board::parse(&self.board)?)
    }

    /// Parse everything except the board, which the caller already has.
    fn decode_with(&self, board: Board) -> Result<MoveQuery, EngineError> {
        let mark = self.mark.as_deref().map(Mark::parse).transpose()?;
        let difficulty = Difficulty::parse(&self.difficulty)?;
        let last_move = self
            .last_move
            .map(|wire| match (usize::try_from(wire.row), usize::try_from(wire.column)) {
                (Ok(row), Ok(column)) => Ok(Move::new(row, column)),
                _ => Err(EngineError::InvalidLastMove {
                    row: wire.row,
                    column: wire.column,
                    size: board.rows(),
                }),
            })
            .transpose()?;
        Ok(MoveQuery {
            board,
            mark,
            difficulty,
            last_move,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub kind: String,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Moved {
        winner: Option<String>,
        region: Option<Region>,
        #[serde(rename = "lastMove")]
        last_move: Option<Move>,
        board: Vec<Vec<String>>,
    },
    Failed {
        error: ErrorBody,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MoveResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub ok: bool,
    #[serde(flatten)]
    pub body: ResponseBody,
}

impl MoveResponse {
    pub fn moved(id: Option<Value>, result: &MoveOutcome) -> Self {
        let winner = match result.outcome {
            Outcome::Win(mark) => Some(mark.symbol().to_string()),
            Outcome::Draw => Some("draw".to_string()),
            Outcome::InProgress => None,
        };
        Self {
            id,
            ok: true,
            body: ResponseBody::Moved {
                winner,
                region: result.region,
                last_move: result.mv,
                board: result.board.to_symbols(),
            },
        }
    }

    pub fn failed(id: Option<Value>, kind: &str, message: String) -> Self {
        Self {
            id,
            ok: false,
            body: ResponseBody::Failed {
                error: ErrorBody {
                    kind: kind.to_string(),
                    message,
                },
            },
        }
    }

    fn from_error(id: Option<Value>, err: &EngineError) -> Self {
        Self::failed(id, err.kind(), err.to_string())
    }
}

/// Serves move requests over a line-oriented stream.
pub struct Server {
    engine: Engine,
}

impl Server {
    pub fn new(engine: Engine) -> Self {
        Self { engine }
    }

    /// Answer one decoded request.
    ///
    /// A board that is already won is answered from the board alone, before
    /// the mark, difficulty and last move are looked at.
    pub fn respond(&mut self, request: MoveRequest) -> MoveResponse {
        let id = request.id.clone();
        let result = Board::parse(&request.board).and_then(|board| {
            if let Some(done) = settled(&board) {
                return Ok(done);
            }
            let q = request.decode_with(board)?;
            self.engine
                .play(q.board, q.mark, q.difficulty, q.last_move)
        });
        match result {
            Ok(outcome) => MoveResponse::moved(id, &outcome),
            Err(err) => {
                debug!(kind = err.kind(), %err, "request failed");
                MoveResponse::from_error(id, &err)
            }
        }
    }

    /// Answer one raw line of JSON.
    pub fn handle_line(&mut self, line: &str) -> MoveResponse {
        match serde_json::from_str::<MoveRequest>(line) {
            Ok(request) => self.respond(request),
            Err(err) => {
                warn!(%err, "unparseable request");
                MoveResponse::failed(None, MALFORMED_REQUEST, err.to_string())
            }
        }
    }

    /// Read requests from `input` until EOF, writing one response line each.
    ///
    /// Blank lines and lines starting with `#` are skipped.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> io::Result<()> {
        for line in input.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let response = self.handle_line(line);
            serde_json::to_writer(&mut output, &response)?;
            writeln!(output)?;
            output.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn server() -> Server {
        Server::new(Engine::with_seed(1))
    }

    #[test]
    fn test_decode_full_request() {
        let request: MoveRequest = serde_json::from_value(json!({
            "board": [["x", "", ""], ["", "o", ""], ["", "", ""]],
            "mark": "x",
            "difficulty": "very-easy",
            "lastMove": {"row": 1, "column": 1}
        }))
        .unwrap();
        let query = request.decode().unwrap();
        assert_eq!(query.mark, Some(Mark::X));
        assert_eq!(query.difficulty, Difficulty::VeryEasy);
        assert_eq!(query.last_move, Some(Move::new(1, 1)));
        assert_eq!(query.board.count(Mark::O), 1);
    }

    #[test]
    fn test_decode_errors() {
        let base = json!({"board": [["", "", ""], ["", "", ""], ["", "", ""]], "difficulty": "easy"});

        let mut bad_mark = base.clone();
        bad_mark["mark"] = json!("z");
        let request: MoveRequest = serde_json::from_value(bad_mark).unwrap();
        assert_eq!(request.decode().unwrap_err().kind(), "InvalidMark");

        let mut bad_difficulty = base.clone();
        bad_difficulty["difficulty"] = json!("nightmare");
        let request: MoveRequest = serde_json::from_value(bad_difficulty).unwrap();
        assert_eq!(request.decode().unwrap_err().kind(), "UnknownDifficulty");

        let mut negative = base;
        negative["lastMove"] = json!({"row": -1, "column": 0});
        let request: MoveRequest = serde_json::from_value(negative).unwrap();
        assert_eq!(request.decode().unwrap_err().kind(), "InvalidLastMove");
    }

    #[test]
    fn test_response_shape_on_success() {
        let mut server = server();
        let response = server.handle_line(
            r#"{"id": "a1", "board": [["", "", ""], ["", "", ""], ["", "", ""]], "difficulty": "hard"}"#,
        );
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["id"], json!("a1"));
        assert_eq!(value["ok"], json!(true));
        assert_eq!(value["winner"], Value::Null);
        assert_eq!(value["region"], Value::Null);
        assert_eq!(value["lastMove"], json!({"row": 1, "column": 1}));
        assert_eq!(value["board"][1][1], json!("x"));
    }

    #[test]
    fn test_response_shape_on_error() {
        let mut server = server();
        let response = server.handle_line(
            r#"{"board": [["x","o","x"],["x","o","o"],["o","x","x"]], "difficulty": "hard"}"#,
        );
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["ok"], json!(false));
        assert_eq!(value["error"]["kind"], json!("NoAvailableMoves"));
        assert!(value.get("id").is_none());
    }

    #[test]
    fn test_won_board_answered_before_field_checks() {
        let mut server = server();
        for line in [
            r#"{"board": [["x","x","x"],["o","o",""],["","",""]], "difficulty": "expert"}"#,
            r#"{"board": [["x","x","x"],["o","o",""],["","",""]], "mark": "z", "difficulty": "hard"}"#,
            r#"{"board": [["x","x","x"],["o","o",""],["","",""]], "difficulty": "easy", "lastMove": {"row": -4, "column": 9}}"#,
        ] {
            let value = serde_json::to_value(server.handle_line(line)).unwrap();
            assert_eq!(value["ok"], json!(true), "{line}");
            assert_eq!(value["winner"], json!("x"));
            assert_eq!(value["lastMove"], Value::Null);
            assert_eq!(value["region"], Value::Null);
            assert_eq!(value["board"][1], json!(["o", "o", ""]));
        }

        // Open boards still reject bad fields.
        let response = server.handle_line(
            r#"{"board": [["x","x",""],["o","o",""],["","",""]], "difficulty": "expert"}"#,
        );
        assert!(matches!(
            response.body,
            ResponseBody::Failed { ref error } if error.kind == "UnknownDifficulty"
        ));
    }

    #[test]
    fn test_malformed_json() {
        let mut server = server();
        let response = server.handle_line("{not json");
        assert!(!response.ok);
        assert!(matches!(
            response.body,
            ResponseBody::Failed { ref error } if error.kind == MALFORMED_REQUEST
        ));
    }

    #[test]
    fn test_region_serializes_camel_case() {
        let mut server = server();
        let response = server.handle_line(
            r#"{"board": [["","","",""],["","x","",""],["","","",""],["","","",""]], "difficulty": "easy", "lastMove": {"row": 1, "column": 1}}"#,
        );
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(
            value["region"],
            json!({"startRow": 0, "endRow": 2, "startColumn": 0, "endColumn": 2})
        );
    }

    #[test]
    fn test_run_skips_blank_and_comment_lines() {
        let input = "\n# warm-up\n{\"board\": [[\"\",\"\",\"\"],[\"\",\"\",\"\"],[\"\",\"\",\"\"]], \"difficulty\": \"medium\"}\n";
        let mut output = Vec::new();
        server().run(input.as_bytes(), &mut output).unwrap();
        let text = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 1);
        let value: Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(value["ok"], json!(true));
    }
}
