//! Ramus is a generic, work-stealing parallel depth-first search engine for
//! constraint solvers.
//!
//! The engine is problem-agnostic: it knows nothing about variables,
//! domains or propagators. A problem plugs in by implementing the [`Space`]
//! contract — propagate, branch, clone, commit — and the engine supplies
//! exploration: a pool of worker threads walking the search tree
//! depth-first, trading memory for recomputation along each worker's path,
//! and stealing subtrees from each other when they run dry.
//!
//! # Core Concepts
//!
//! - **[`Space`]**: A trait you implement to define a node of your search
//!   tree: propagation to fixpoint, branching descriptions, cloning and
//!   committing of alternatives.
//! - **[`BranchDesc`]**: The immutable description of one branching choice,
//!   with `alternatives() >= 1` children.
//! - **[`DfsEngine`]**: The engine that owns the worker pool. Its
//!   [`next`](crate::search::engine::DfsEngine::next) method blocks until
//!   the next solution (or exhaustion) and parks the workers in between.
//! - **[`StopPolicy`]**: An optional predicate over search statistics that
//!   ends the search early.
//!
//! # Example: Enumerating Bit-Strings
//!
//! A minimal space that branches on one bit per level and accepts every
//! complete string. With two levels, the engine delivers four solutions and
//! then reports exhaustion.
//!
//! ```
//! use ramus::search::engine::DfsEngine;
//! use ramus::search::options::Options;
//! use ramus::search::statistics::Statistics;
//! use ramus::space::{BranchDesc, Space, SpaceStatus};
//!
//! #[derive(Debug)]
//! struct BitChoice;
//!
//! impl BranchDesc for BitChoice {
//!     fn alternatives(&self) -> u32 {
//!         2
//!     }
//! }
//!
//! #[derive(Debug, Clone)]
//! struct Bits {
//!     chosen: Vec<bool>,
//!     len: usize,
//! }
//!
//! impl Space for Bits {
//!     type Branch = BitChoice;
//!
//!     fn status(&mut self, stats: &mut Statistics) -> SpaceStatus {
//!         stats.propagations += 1;
//!         if self.chosen.len() == self.len {
//!             SpaceStatus::Solved
//!         } else {
//!             SpaceStatus::Branch
//!         }
//!     }
//!
//!     fn description(&mut self) -> BitChoice {
//!         BitChoice
//!     }
//!
//!     fn clone_space(&self, _share: bool) -> Self {
//!         self.clone()
//!     }
//!
//!     fn commit(&mut self, _desc: &BitChoice, alt: u32) {
//!         self.chosen.push(alt == 1);
//!     }
//! }
//!
//! let root = Bits { chosen: Vec::new(), len: 2 };
//! let mut engine = DfsEngine::new(root, Options::default()).unwrap();
//!
//! let mut found = 0;
//! while let Some(solution) = engine.next() {
//!     assert_eq!(solution.chosen.len(), 2);
//!     found += 1;
//! }
//! assert_eq!(found, 4);
//! assert!(!engine.stopped());
//! ```
//!
//! Parallel search is a matter of options: `Options::default()
//! .with_workers(4)` runs the same exploration over four workers. Solutions
//! then arrive in whatever order the workers find them, and a
//! [`StopPolicy`] such as [`NodeLimit`] bounds the effort:
//!
//! ```
//! use ramus::search::options::Options;
//! use ramus::search::stop::NodeLimit;
//!
//! let options = Options::default()
//!     .with_workers(4)
//!     .with_commit_distance(8)
//!     .with_adapt_distance(2)
//!     .with_stop(Box::new(NodeLimit { max_nodes: 1_000_000 }));
//! # let _ = options;
//! ```
//!
//! [`Space`]: crate::space::Space
//! [`BranchDesc`]: crate::space::BranchDesc
//! [`DfsEngine`]: crate::search::engine::DfsEngine
//! [`StopPolicy`]: crate::search::stop::StopPolicy
//! [`NodeLimit`]: crate::search::stop::NodeLimit

pub mod error;
pub mod search;
pub mod space;
