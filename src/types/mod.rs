//! Typed representations of DTCG `$type` value shapes.
//!
//! The only value model the core itself needs is [`alias`]: the resolver's
//! composite-type compatibility check (spec §4.D) compares a terminal
//! token's `$type` *name* against the expected set, it never has to parse
//! the resolved value's shape (spec §1 Non-goals: "validating every DTCG
//! type's value shape beyond what is needed to drive alias traversal" is
//! explicitly out of scope).

pub mod alias;
