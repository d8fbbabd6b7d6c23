//! Parser for `fb.modes`-style video mode databases.
//!
//! The format is line-oriented keyword text; `#` starts a comment running
//! to the end of the line:
//!
//! ```text
//! mode "640x480-60"
//!     # H: 31.469 kHz, V: 59.94 Hz
//!     geometry 640 480 640 480 8
//!     timings 39721 48 16 33 10 96 2
//!     hsync low
//!     vsync low
//! endmode
//! ```
//!
//! `geometry` takes `xres yres vxres vyres depth`; `timings` takes
//! `pixclock left right upper lower hslen vslen`. The flag settings
//! (`hsync`, `vsync`, `csync`, `extsync`, `bcast`, `laced`, `double`) take
//! one boolean-like token each. Settings may appear in any order and any of
//! them may be omitted; omitted fields stay zero and the catalog's
//! scan-rate validation rejects the record if that leaves it degenerate.
//!
//! The parser produces plain [`ModeRecord`]s in file order. Duplicate names
//! are not its concern; catalog insertion rejects those.

use std::fs;
use std::path::Path;

use fbtune::{parse_bool_token, ModeError, ModeRecord, Polarity};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DbError>;

/// Mode-database read/parse failure. Parse variants carry the 1-based
/// source line.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: expected {expected}, found `{found}`")]
    Unexpected {
        line: usize,
        expected: &'static str,
        found: String,
    },

    #[error("line {line}: unexpected end of file")]
    UnexpectedEof { line: usize },

    #[error("line {line}: invalid number `{token}`")]
    InvalidNumber { line: usize, token: String },

    #[error("line {line}: {source}")]
    Value {
        line: usize,
        #[source]
        source: ModeError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Word(String),
    Quoted(String),
}

impl Token {
    fn describe(&self) -> &str {
        match self {
            Token::Word(w) => w,
            Token::Quoted(q) => q,
        }
    }
}

fn tokenize(text: &str) -> Result<Vec<(usize, Token)>> {
    let mut tokens = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let mut chars = raw.chars().peekable();
        while let Some(&c) = chars.peek() {
            if c.is_whitespace() {
                chars.next();
            } else if c == '#' {
                break;
            } else if c == '"' {
                chars.next();
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some(c) => name.push(c),
                        None => {
                            return Err(DbError::Unexpected {
                                line,
                                expected: "closing quote",
                                found: "end of line".to_string(),
                            })
                        }
                    }
                }
                tokens.push((line, Token::Quoted(name)));
            } else {
                let mut word = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_whitespace() || c == '#' || c == '"' {
                        break;
                    }
                    word.push(c);
                    chars.next();
                }
                tokens.push((line, Token::Word(word)));
            }
        }
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<(usize, Token)>,
    pos: usize,
    last_line: usize,
}

impl Parser {
    fn next(&mut self) -> Option<(usize, Token)> {
        let entry = self.tokens.get(self.pos).cloned()?;
        self.pos += 1;
        self.last_line = entry.0;
        Some(entry)
    }

    fn expect(&mut self) -> Result<(usize, Token)> {
        self.next().ok_or(DbError::UnexpectedEof {
            line: self.last_line,
        })
    }

    fn word(&mut self, expected: &'static str) -> Result<(usize, String)> {
        match self.expect()? {
            (line, Token::Word(w)) => Ok((line, w)),
            (line, token) => Err(DbError::Unexpected {
                line,
                expected,
                found: token.describe().to_string(),
            }),
        }
    }

    fn quoted(&mut self, expected: &'static str) -> Result<(usize, String)> {
        match self.expect()? {
            (line, Token::Quoted(q)) => Ok((line, q)),
            (line, token) => Err(DbError::Unexpected {
                line,
                expected,
                found: token.describe().to_string(),
            }),
        }
    }

    /// Unsigned number, decimal or `0x` hex.
    fn number(&mut self) -> Result<u32> {
        let (line, word) = self.word("a number")?;
        let parsed = if let Some(hex) = word.strip_prefix("0x").or_else(|| word.strip_prefix("0X"))
        {
            u32::from_str_radix(hex, 16)
        } else {
            word.parse()
        };
        parsed.map_err(|_| DbError::InvalidNumber { line, token: word })
    }

    fn boolean(&mut self) -> Result<bool> {
        let (line, word) = self.word("a boolean value")?;
        parse_bool_token(&word).map_err(|source| DbError::Value { line, source })
    }

    fn polarity(&mut self) -> Result<Polarity> {
        self.boolean().map(Polarity::from)
    }

    fn mode_block(&mut self) -> Result<ModeRecord> {
        let (_, name) = self.quoted("a quoted mode name")?;
        let mut record = ModeRecord {
            name,
            ..ModeRecord::default()
        };
        loop {
            let (line, word) = self.word("a mode setting or `endmode`")?;
            match word.as_str() {
                "geometry" => {
                    record.xres = self.number()?;
                    record.yres = self.number()?;
                    record.vxres = self.number()?;
                    record.vyres = self.number()?;
                    record.depth = self.number()?;
                }
                "timings" => {
                    record.pixclock = self.number()?;
                    record.left = self.number()?;
                    record.right = self.number()?;
                    record.upper = self.number()?;
                    record.lower = self.number()?;
                    record.hslen = self.number()?;
                    record.vslen = self.number()?;
                }
                "hsync" => record.hsync = self.polarity()?,
                "vsync" => record.vsync = self.polarity()?,
                "csync" => record.csync = self.polarity()?,
                "extsync" => record.extsync = self.boolean()?,
                "bcast" => record.bcast = self.boolean()?,
                "laced" => record.laced = self.boolean()?,
                "double" => record.dblscan = self.boolean()?,
                "endmode" => break,
                _ => {
                    return Err(DbError::Unexpected {
                        line,
                        expected: "a mode setting or `endmode`",
                        found: word,
                    })
                }
            }
        }
        Ok(record)
    }
}

/// Parse a mode database from text, returning the records in file order.
pub fn parse_mode_db(text: &str) -> Result<Vec<ModeRecord>> {
    let mut parser = Parser {
        tokens: tokenize(text)?,
        pos: 0,
        last_line: 1,
    };
    let mut records = Vec::new();
    while let Some((line, token)) = parser.next() {
        match token {
            Token::Word(ref w) if w == "mode" => records.push(parser.mode_block()?),
            token => {
                return Err(DbError::Unexpected {
                    line,
                    expected: "`mode`",
                    found: token.describe().to_string(),
                })
            }
        }
    }
    Ok(records)
}

/// Read and parse the mode database at `path`.
pub fn read_mode_db(path: impl AsRef<Path>) -> Result<Vec<ModeRecord>> {
    let path = path.as_ref();
    let records = parse_mode_db(&fs::read_to_string(path)?)?;
    tracing::debug!("parsed {} modes from {}", records.len(), path.display());
    Ok(records)
}
