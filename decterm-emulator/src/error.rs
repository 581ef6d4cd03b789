// Copyright (C) 2024-2025 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use thiserror::Error;

/// Failures surfaced while digesting escape sequences. None of these
/// escape the byte-consume path; they are logged and the offending
/// sequence is dropped.
#[derive(Error, Debug, Eq, PartialEq)]
pub enum ParserFailures {
    #[error("malformed CSI parameters: {0:?}")]
    MalformedCsi(Vec<u8>),
    #[error("malformed OSC payload: {0}")]
    MalformedOsc(String),
    #[error("sixel raster exceeds {width}x{height}")]
    SixelTooLarge { width: usize, height: usize },
    #[error("invalid sixel raster header")]
    BadSixelRaster,
    #[error("inline image rejected: {0}")]
    ImageRejected(&'static str),
    #[error("bad base64 payload: {0}")]
    BadBase64(String),
}

/// Failures on the I/O side of the terminal.
#[derive(Error, Debug)]
pub enum TerminalIoError {
    #[error("outbound write failed")]
    WriteFailed(#[source] std::io::Error),
    #[error("terminal already closed")]
    Closed,
}
