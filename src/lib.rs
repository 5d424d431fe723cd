//! A persistent virtual namespace of folders and content-less files.
//!
//! The tree ([`filesystem::Tree`]) is loaded from a key-value store by a
//! [`store::TreeStore`], mutated through the validated operations of
//! [`namespace`], and saved in full after every successful change. A
//! [`session::Session`] adds the folder currently being browsed and a single
//! command dispatcher for front-ends.
//!
//! ```
//! use shareplace::filesystem::NodePath;
//! use shareplace::session::{Command, Session};
//! use shareplace::storage::MemoryStore;
//! use shareplace::store::TreeStore;
//!
//! let mut session = Session::open(TreeStore::new(MemoryStore::new()));
//! session.dispatch(Command::CreateFolder { name: "Docs".into() }).unwrap();
//! session.dispatch(Command::Navigate { name: "Docs".into() }).unwrap();
//! assert_eq!(session.current_path(), &NodePath::parse("/Docs"));
//! ```

pub mod config;
pub mod filesystem;
pub mod namespace;
pub mod session;
pub mod storage;
pub mod store;
