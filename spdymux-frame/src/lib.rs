//! Data structures of SPDY frames (draft-mbelshe-httpbis-spdy-00).
//!
//! All the frame types are in the `frame` module, the `header` module has the
//! name-value mapping carried by SYN_STREAM, SYN_REPLY and HEADERS frames.
//! Encoding frames to bytes and back is the job of the wire codec, which only
//! fills in the parts this crate leaves at their defaults, for example the
//! protocol version of a control frame header.
pub mod frame;
pub mod header;


#[macro_use]
extern crate bitflags;
