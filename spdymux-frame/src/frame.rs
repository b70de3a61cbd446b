use crate::header::Headers;
use bytes::Bytes;

/// Identifies one logical stream within a session. Stream id 0 is reserved
/// for frames which belong to the session as a whole.
pub type StreamId = u32;
/// Status code carried by RST_STREAM frames.
pub type StatusCode = u32;

pub const PROTOCOL_ERROR: StatusCode = 1;
pub const INVALID_STREAM: StatusCode = 2;
pub const REFUSED_STREAM: StatusCode = 3;
pub const UNSUPPORTED_VERSION: StatusCode = 4;
pub const CANCEL: StatusCode = 5;
pub const INTERNAL_ERROR: StatusCode = 6;
pub const FLOW_CONTROL_ERROR: StatusCode = 7;
pub const STREAM_IN_USE: StatusCode = 8;
/// Introduced in SPDY version 3. Sent in response to a frame received on an
/// already closed stream, except when that frame is itself a RST_STREAM.
pub const STREAM_ALREADY_CLOSED: StatusCode = 9;

bitflags! {
    /// Flag bits of the common control frame header.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct ControlFlags: u8 {
        const FIN = 0x01;
        const UNIDIRECTIONAL = 0x02;
    }
}

impl Default for ControlFlags {
    fn default() -> Self {
        ControlFlags::empty()
    }
}

bitflags! {
    /// Flag bits of a data frame.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct DataFlags: u8 {
        const FIN = 0x01;
        const COMPRESSED = 0x02;
    }
}

impl Default for DataFlags {
    fn default() -> Self {
        DataFlags::empty()
    }
}

/// Common part of every control frame. The version is filled in by the wire
/// codec, the constructors of this crate leave it at the default.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ControlFrameHeader {
    pub version: u16,
    pub flags: ControlFlags,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SynStreamFrame {
    pub header: ControlFrameHeader,
    pub stream_id: StreamId,
    pub associated_to_stream_id: StreamId,
    pub priority: u8,
    pub headers: Headers,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SynReplyFrame {
    pub header: ControlFrameHeader,
    pub stream_id: StreamId,
    pub headers: Headers,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HeadersFrame {
    pub header: ControlFrameHeader,
    pub stream_id: StreamId,
    pub headers: Headers,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RstStreamFrame {
    pub header: ControlFrameHeader,
    pub stream_id: StreamId,
    pub status: StatusCode,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NoopFrame {
    pub header: ControlFrameHeader,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SettingsFrame {
    pub header: ControlFrameHeader,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PingFrame {
    pub header: ControlFrameHeader,
    pub id: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GoAwayFrame {
    pub header: ControlFrameHeader,
    pub last_good_stream_id: StreamId,
}

#[derive(Clone, Default, PartialEq, Eq)]
pub struct DataFrame {
    pub stream_id: StreamId,
    pub flags: DataFlags,
    pub data: Bytes,
}

impl std::fmt::Debug for DataFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let data = String::from_utf8_lossy(&self.data[..std::cmp::min(64usize, self.data.len())]);

        f.write_fmt(format_args!(
            "DataFrame {{ stream_id: {}, flags: {:?}, data: \"{}\" }}",
            &self.stream_id, &self.flags, data
        ))
    }
}

/// Represents a SPDY frame.
///
/// The first five variants belong to one stream, the rest are session level
/// control frames which carry stream id 0 and no fin flag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Frame {
    Data(DataFrame),
    /// The frame opening a stream, sent by the initiating endpoint.
    SynStream(SynStreamFrame),
    /// The answer of the accepting endpoint to a SYN_STREAM.
    SynReply(SynReplyFrame),
    Headers(HeadersFrame),
    /// Terminates both directions of a stream with a status code.
    RstStream(RstStreamFrame),
    Noop(NoopFrame),
    Settings(SettingsFrame),
    Ping(PingFrame),
    GoAway(GoAwayFrame),
}

impl Frame {
    /// The stream the frame belongs to, 0 for session level frames.
    pub fn stream_id(&self) -> StreamId {
        match self {
            Frame::Data(f) => f.stream_id,
            Frame::SynStream(f) => f.stream_id,
            Frame::SynReply(f) => f.stream_id,
            Frame::Headers(f) => f.stream_id,
            Frame::RstStream(f) => f.stream_id,
            Frame::Noop(_) | Frame::Settings(_) | Frame::Ping(_) | Frame::GoAway(_) => 0,
        }
    }

    /// The header mapping of the frame. Only SYN_STREAM, SYN_REPLY and
    /// HEADERS frames carry one.
    pub fn headers(&self) -> Option<&Headers> {
        match self {
            Frame::SynStream(f) => Some(&f.headers),
            Frame::SynReply(f) => Some(&f.headers),
            Frame::Headers(f) => Some(&f.headers),
            _ => None,
        }
    }

    /// Whether the frame asks the carrying direction to close after it.
    pub fn fin(&self) -> bool {
        match self {
            Frame::Data(f) => f.flags.contains(DataFlags::FIN),
            Frame::SynStream(f) => f.header.flags.contains(ControlFlags::FIN),
            Frame::SynReply(f) => f.header.flags.contains(ControlFlags::FIN),
            Frame::Headers(f) => f.header.flags.contains(ControlFlags::FIN),
            Frame::RstStream(f) => f.header.flags.contains(ControlFlags::FIN),
            Frame::Noop(_) | Frame::Settings(_) | Frame::Ping(_) | Frame::GoAway(_) => false,
        }
    }
}

impl From<DataFrame> for Frame {
    fn from(f: DataFrame) -> Frame {
        Frame::Data(f)
    }
}

impl From<RstStreamFrame> for Frame {
    fn from(f: RstStreamFrame) -> Frame {
        Frame::RstStream(f)
    }
}

fn control_flags(fin: bool) -> ControlFlags {
    if fin {
        ControlFlags::FIN
    } else {
        ControlFlags::empty()
    }
}

pub fn syn_stream(stream_id: StreamId, headers: Headers, fin: bool) -> Frame {
    Frame::SynStream(SynStreamFrame {
        header: ControlFrameHeader {
            flags: control_flags(fin),
            ..Default::default()
        },
        stream_id,
        headers,
        ..Default::default()
    })
}

pub fn syn_reply(stream_id: StreamId, headers: Headers, fin: bool) -> Frame {
    Frame::SynReply(SynReplyFrame {
        header: ControlFrameHeader {
            flags: control_flags(fin),
            ..Default::default()
        },
        stream_id,
        headers,
    })
}

pub fn headers(stream_id: StreamId, headers: Headers, fin: bool) -> Frame {
    Frame::Headers(HeadersFrame {
        header: ControlFrameHeader {
            flags: control_flags(fin),
            ..Default::default()
        },
        stream_id,
        headers,
    })
}

pub fn data(stream_id: StreamId, data: Bytes, fin: bool) -> Frame {
    let flags = if fin { DataFlags::FIN } else { DataFlags::empty() };

    Frame::Data(DataFrame {
        stream_id,
        flags,
        data,
    })
}

pub fn rst_stream(stream_id: StreamId, status: StatusCode) -> Frame {
    Frame::RstStream(RstStreamFrame {
        header: ControlFrameHeader::default(),
        stream_id,
        status,
    })
}

pub fn noop() -> Frame {
    Frame::Noop(NoopFrame::default())
}

pub fn settings() -> Frame {
    Frame::Settings(SettingsFrame::default())
}

pub fn ping(id: u32) -> Frame {
    Frame::Ping(PingFrame {
        header: ControlFrameHeader::default(),
        id,
    })
}

pub fn goaway(last_good_stream_id: StreamId) -> Frame {
    Frame::GoAway(GoAwayFrame {
        header: ControlFrameHeader::default(),
        last_good_stream_id,
    })
}
