//! dsviz animates operations on six classic data structures (array, string,
//! singly linked list, stack, queue, binary search tree) one frame at a time.
//!
//! The core lives in [`structures`]: each controller owns its logical value
//! plus the state of the animation in flight and is advanced by calling
//! `step` once per frame. [`workbench`] groups the six controllers,
//! [`command`] parses the text commands typed by the user, [`headless`]
//! replays them without a terminal, and [`app`] / [`ui`] form the ratatui
//! front-end.

pub mod animation;
pub mod app;
pub mod command;
pub mod config;
pub mod error;
pub mod event;
pub mod headless;
pub mod structures;
pub mod ui;
pub mod workbench;
