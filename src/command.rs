//! Turns a typed command line into a [`PendingOp`] for one structure.
//!
//! Values must parse completely; anything malformed is rejected here and never
//! reaches a controller. Bounds are checked separately by [`validate`] against
//! the current size, so the caller can report the problem instead of letting
//! the controller silently ignore the request.

use tracing::warn;

use crate::error::{VizError, VizResult};
use crate::structures::{ListOp, QueueOp, SeqOp, StackOp, TraversalOrder, TreeOp};
use crate::workbench::{PendingOp, StructureKind};

/// Command words understood by each structure, for the help screen
pub fn usage(kind: StructureKind) -> &'static [&'static str] {
    match kind {
        StructureKind::Array => &[
            "insert <index> <value>",
            "remove <index>",
            "search <value>",
            "update <index> <value>",
        ],
        StructureKind::String => &[
            "insert <index> <text>",
            "remove <index>",
            "search <char>",
            "update <index> <char>",
        ],
        StructureKind::LinkedList => &[
            "head <value>",
            "tail <value>",
            "at <position> <value>",
            "delete <position>",
            "update <position> <value>",
            "search <value>",
        ],
        StructureKind::Stack => &["push <value>", "pop", "peek"],
        StructureKind::Queue => &["enqueue <value>", "dequeue", "front"],
        StructureKind::Tree => &[
            "insert <value>",
            "delete <value>",
            "search <value>",
            "inorder | preorder | postorder",
        ],
    }
}

/// Parse one command line for `kind`
pub fn parse(kind: StructureKind, line: &str) -> VizResult<PendingOp> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };
    if verb.is_empty() {
        return Err(VizError::InvalidInput("empty command".into()));
    }
    let verb = verb.to_ascii_lowercase();
    let args: Vec<&str> = rest.split_whitespace().collect();

    let op = match kind {
        StructureKind::Array => PendingOp::Array(match verb.as_str() {
            "insert" | "ins" => {
                expect_args(&verb, &args, 2)?;
                SeqOp::Insert {
                    index: index_arg(args[0])?,
                    values: vec![int_arg(args[1])?],
                }
            }
            "remove" | "delete" | "rm" => {
                expect_args(&verb, &args, 1)?;
                SeqOp::Remove {
                    index: index_arg(args[0])?,
                }
            }
            "search" | "find" => {
                expect_args(&verb, &args, 1)?;
                SeqOp::Search {
                    value: int_arg(args[0])?,
                }
            }
            "update" | "set" => {
                expect_args(&verb, &args, 2)?;
                SeqOp::Update {
                    index: index_arg(args[0])?,
                    value: int_arg(args[1])?,
                }
            }
            _ => return Err(unknown(kind, line)),
        }),
        StructureKind::String => PendingOp::String(match verb.as_str() {
            "insert" | "ins" => {
                // Everything after the index is inserted verbatim, spaces included
                let (index, text) = match rest.split_once(char::is_whitespace) {
                    Some((index, text)) => (index, text.trim_start()),
                    None => (rest, ""),
                };
                if index.is_empty() || text.is_empty() {
                    return Err(VizError::InvalidInput(
                        "usage: insert <index> <text>".into(),
                    ));
                }
                SeqOp::Insert {
                    index: index_arg(index)?,
                    values: unquote(text).chars().collect(),
                }
            }
            "remove" | "delete" | "rm" => {
                expect_args(&verb, &args, 1)?;
                SeqOp::Remove {
                    index: index_arg(args[0])?,
                }
            }
            "search" | "find" => {
                expect_args(&verb, &args, 1)?;
                SeqOp::Search {
                    value: char_arg(args[0])?,
                }
            }
            "update" | "set" => {
                expect_args(&verb, &args, 2)?;
                SeqOp::Update {
                    index: index_arg(args[0])?,
                    value: char_arg(args[1])?,
                }
            }
            _ => return Err(unknown(kind, line)),
        }),
        StructureKind::LinkedList => PendingOp::List(match verb.as_str() {
            "head" | "push_front" => {
                expect_args(&verb, &args, 1)?;
                ListOp::InsertHead {
                    value: int_arg(args[0])?,
                }
            }
            "tail" | "append" | "push_back" => {
                expect_args(&verb, &args, 1)?;
                ListOp::InsertTail {
                    value: int_arg(args[0])?,
                }
            }
            "at" | "insert" => {
                expect_args(&verb, &args, 2)?;
                ListOp::InsertAt {
                    position: index_arg(args[0])?,
                    value: int_arg(args[1])?,
                }
            }
            "delete" | "remove" | "rm" => {
                expect_args(&verb, &args, 1)?;
                ListOp::Delete {
                    position: index_arg(args[0])?,
                }
            }
            "update" | "set" => {
                expect_args(&verb, &args, 2)?;
                ListOp::Update {
                    position: index_arg(args[0])?,
                    value: int_arg(args[1])?,
                }
            }
            "search" | "find" => {
                expect_args(&verb, &args, 1)?;
                ListOp::Search {
                    value: int_arg(args[0])?,
                }
            }
            _ => return Err(unknown(kind, line)),
        }),
        StructureKind::Stack => PendingOp::Stack(match verb.as_str() {
            "push" => {
                expect_args(&verb, &args, 1)?;
                StackOp::Push {
                    value: int_arg(args[0])?,
                }
            }
            "pop" => {
                expect_args(&verb, &args, 0)?;
                StackOp::Pop
            }
            "peek" | "top" => {
                expect_args(&verb, &args, 0)?;
                StackOp::Peek
            }
            _ => return Err(unknown(kind, line)),
        }),
        StructureKind::Queue => PendingOp::Queue(match verb.as_str() {
            "enqueue" | "enq" | "push" => {
                expect_args(&verb, &args, 1)?;
                QueueOp::Enqueue {
                    value: int_arg(args[0])?,
                }
            }
            "dequeue" | "deq" | "pop" => {
                expect_args(&verb, &args, 0)?;
                QueueOp::Dequeue
            }
            "front" | "peek" => {
                expect_args(&verb, &args, 0)?;
                QueueOp::Front
            }
            _ => return Err(unknown(kind, line)),
        }),
        StructureKind::Tree => PendingOp::Tree(match verb.as_str() {
            "insert" | "ins" => {
                expect_args(&verb, &args, 1)?;
                TreeOp::Insert {
                    value: int_arg(args[0])?,
                }
            }
            "delete" | "remove" | "rm" => {
                expect_args(&verb, &args, 1)?;
                TreeOp::Delete {
                    value: int_arg(args[0])?,
                }
            }
            "search" | "find" => {
                expect_args(&verb, &args, 1)?;
                TreeOp::Search {
                    value: int_arg(args[0])?,
                }
            }
            "traverse" => {
                expect_args(&verb, &args, 1)?;
                TreeOp::Traverse {
                    order: args[0].parse::<TraversalOrder>()?,
                }
            }
            other => match other.parse::<TraversalOrder>() {
                Ok(order) => {
                    expect_args(&verb, &args, 0)?;
                    TreeOp::Traverse { order }
                }
                Err(_) => return Err(unknown(kind, line)),
            },
        }),
    };
    Ok(op)
}

/// Split a script into individual commands on `;` and newlines
pub fn split_script(script: &str) -> impl Iterator<Item = &str> {
    script
        .split(|c: char| c == ';' || c == '\n')
        .map(str::trim)
        .filter(|s| !s.is_empty() && !s.starts_with('#'))
}

/// Check indices and positions against the current size of the structure.
///
/// Array and string indices are 0-based; linked-list positions are 1-based.
pub fn validate(op: &PendingOp, len: usize) -> VizResult<()> {
    let check = |what: &'static str, index: usize, valid: std::ops::RangeInclusive<usize>| {
        if valid.contains(&index) {
            Ok(())
        } else {
            Err(VizError::OutOfRange {
                what,
                index: index as i64,
                len,
            })
        }
    };
    let last = len.checked_sub(1);
    match op {
        PendingOp::Array(SeqOp::Insert { index, .. })
        | PendingOp::String(SeqOp::Insert { index, .. }) => check("index", *index, 0..=len),
        PendingOp::Array(SeqOp::Remove { index } | SeqOp::Update { index, .. })
        | PendingOp::String(SeqOp::Remove { index } | SeqOp::Update { index, .. }) => match last
        {
            Some(last) => check("index", *index, 0..=last),
            None => Err(VizError::InvalidInput("structure is empty".into())),
        },
        PendingOp::List(ListOp::InsertAt { position, .. }) => {
            check("position", *position, 1..=len + 1)
        }
        PendingOp::List(ListOp::Delete { position } | ListOp::Update { position, .. }) => {
            check("position", *position, 1..=len)
        }
        _ => Ok(()),
    }
}

fn unknown(kind: StructureKind, line: &str) -> VizError {
    warn!(structure = %kind, line, "unrecognised command");
    VizError::UnknownCommand(format!("{line} (try: {})", usage(kind).join(", ")))
}

fn expect_args(verb: &str, args: &[&str], count: usize) -> VizResult<()> {
    if args.len() == count {
        Ok(())
    } else {
        Err(VizError::InvalidInput(format!(
            "{verb} takes {count} argument{}, got {}",
            if count == 1 { "" } else { "s" },
            args.len()
        )))
    }
}

fn int_arg(raw: &str) -> VizResult<i32> {
    raw.parse()
        .map_err(|_| VizError::InvalidInput(format!("not a number: {raw}")))
}

fn index_arg(raw: &str) -> VizResult<usize> {
    raw.parse()
        .map_err(|_| VizError::InvalidInput(format!("not a valid index: {raw}")))
}

fn char_arg(raw: &str) -> VizResult<char> {
    let raw = unquote(raw);
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(VizError::InvalidInput(format!(
            "expected a single character: {raw}"
        ))),
    }
}

fn unquote(raw: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = raw
            .strip_prefix(quote)
            .and_then(|s| s.strip_suffix(quote))
        {
            if !inner.is_empty() {
                return inner;
            }
        }
    }
    raw
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_commands() {
        assert_eq!(
            parse(StructureKind::Array, "insert 2 99").unwrap(),
            PendingOp::Array(SeqOp::Insert {
                index: 2,
                values: vec![99]
            })
        );
        assert_eq!(
            parse(StructureKind::Array, "  REMOVE   0 ").unwrap(),
            PendingOp::Array(SeqOp::Remove { index: 0 })
        );
        assert!(matches!(
            parse(StructureKind::Array, "insert two 99"),
            Err(VizError::InvalidInput(_))
        ));
        assert!(matches!(
            parse(StructureKind::Array, "push 1"),
            Err(VizError::UnknownCommand(_))
        ));
    }

    #[test]
    fn test_string_insert_keeps_spaces() {
        let op = parse(StructureKind::String, "insert 5  world").unwrap();
        assert_eq!(
            op,
            PendingOp::String(SeqOp::Insert {
                index: 5,
                values: "world".chars().collect()
            })
        );
        let op = parse(StructureKind::String, "insert 0 \"a b\"").unwrap();
        assert_eq!(
            op,
            PendingOp::String(SeqOp::Insert {
                index: 0,
                values: vec!['a', ' ', 'b']
            })
        );
        assert!(parse(StructureKind::String, "search ab").is_err());
        assert_eq!(
            parse(StructureKind::String, "update 1 'x'").unwrap(),
            PendingOp::String(SeqOp::Update { index: 1, value: 'x' })
        );
    }

    #[test]
    fn test_list_commands() {
        assert_eq!(
            parse(StructureKind::LinkedList, "at 3 7").unwrap(),
            PendingOp::List(ListOp::InsertAt {
                position: 3,
                value: 7
            })
        );
        assert_eq!(
            parse(StructureKind::LinkedList, "tail -4").unwrap(),
            PendingOp::List(ListOp::InsertTail { value: -4 })
        );
    }

    #[test]
    fn test_stack_queue_commands() {
        assert_eq!(
            parse(StructureKind::Stack, "pop").unwrap(),
            PendingOp::Stack(StackOp::Pop)
        );
        assert!(parse(StructureKind::Stack, "pop 3").is_err());
        assert_eq!(
            parse(StructureKind::Queue, "front").unwrap(),
            PendingOp::Queue(QueueOp::Front)
        );
    }

    #[test]
    fn test_tree_traversals() {
        assert_eq!(
            parse(StructureKind::Tree, "postorder").unwrap(),
            PendingOp::Tree(TreeOp::Traverse {
                order: TraversalOrder::Postorder
            })
        );
        assert_eq!(
            parse(StructureKind::Tree, "traverse inorder").unwrap(),
            PendingOp::Tree(TreeOp::Traverse {
                order: TraversalOrder::Inorder
            })
        );
    }

    #[test]
    fn test_empty_line_rejected() {
        assert!(matches!(
            parse(StructureKind::Queue, "   "),
            Err(VizError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_validate_bounds() {
        let insert = parse(StructureKind::Array, "insert 5 1").unwrap();
        assert!(validate(&insert, 5).is_ok());
        let insert = parse(StructureKind::Array, "insert 6 1").unwrap();
        assert!(matches!(
            validate(&insert, 5),
            Err(VizError::OutOfRange { index: 6, len: 5, .. })
        ));

        let delete = parse(StructureKind::LinkedList, "delete 0").unwrap();
        assert!(validate(&delete, 4).is_err());
        let delete = parse(StructureKind::LinkedList, "delete 4").unwrap();
        assert!(validate(&delete, 4).is_ok());

        let remove = parse(StructureKind::Array, "remove 0").unwrap();
        assert!(validate(&remove, 0).is_err());
    }

    #[test]
    fn test_split_script() {
        let parts: Vec<_> = split_script("insert 2 99; remove 0\n# note\n\nsearch 30").collect();
        assert_eq!(parts, vec!["insert 2 99", "remove 0", "search 30"]);
    }
}
