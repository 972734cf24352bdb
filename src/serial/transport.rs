// Byte-stream seam between protocol code and hardware
//
// The radio protocol only ever needs two primitives: write a buffer and
// read an exact number of bytes within the port timeout. Keeping the seam
// this narrow lets the protocol run unchanged against the test mock.

use super::comm::Result;

#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Write the whole buffer.
    async fn write_all(&mut self, buf: &[u8]) -> Result<()>;

    /// Read exactly buf.len() bytes, failing on timeout.
    async fn read_exact(&mut self, buf: &mut [u8]) -> Result<()>;
}
