// Channel store - get/put/erase on single slots plus bulk import/export
// over the full channel table

use std::collections::BTreeMap;

use crate::core::constants::{CHANNEL_MAX, CHANNEL_MIN, ERASED_RECORD, RECORD_SIZE};
use crate::core::{checksum, Channel, ValidationError};
use crate::serial::Transport;

use super::protocol::{RadioError, RadioLink, RadioResult, CMD_WRITE_CHANNEL};

/// Orchestrates the command protocol and the record codec for channel
/// memory operations. Borrows the link so the caller keeps it for the
/// non-channel commands.
pub struct ChannelStore<'a, T: Transport> {
    link: &'a mut RadioLink<T>,
}

impl<'a, T: Transport> ChannelStore<'a, T> {
    pub fn new(link: &'a mut RadioLink<T>) -> Self {
        Self { link }
    }

    /// Read one channel. `Ok(None)` means the slot is unprogrammed.
    pub async fn get(&mut self, number: u8) -> RadioResult<Option<Channel>> {
        self.link.disable_radio().await?;
        let response = self.link.fetch_channel(number).await;
        self.link.enable_radio().await?;

        let (data, received) = response?;
        let expected = checksum(&data);
        if received != expected {
            return Err(RadioError::ChecksumMismatch { expected, received });
        }

        // The erased sentinel is not a decodable record
        if Channel::is_erased(&data) {
            return Ok(None);
        }

        Ok(Some(Channel::decode(number, &data)?))
    }

    /// Write one channel record.
    pub async fn put(&mut self, channel: &Channel) -> RadioResult<()> {
        let data = channel.encode()?;
        self.put_raw(channel.number, &data).await
    }

    /// Overwrite one slot with the unprogrammed sentinel. Bypasses the
    /// encoder entirely; the sentinel is not a valid record.
    pub async fn erase(&mut self, number: u8) -> RadioResult<()> {
        self.put_raw(number, &ERASED_RECORD).await
    }

    async fn put_raw(&mut self, number: u8, data: &[u8; RECORD_SIZE]) -> RadioResult<()> {
        self.link.disable_radio().await?;
        let ack = self.link.send_channel(number, data).await;
        self.link.enable_radio().await?;

        let received = ack?;
        if received != CMD_WRITE_CHANNEL {
            return Err(RadioError::BadAck {
                expected: CMD_WRITE_CHANNEL,
                received,
            });
        }
        Ok(())
    }

    /// Lazily pull all programmed channels off the radio, lowest number
    /// first. Each element is a live device round trip, so the sequence
    /// is not restartable: iterating again replays the hardware reads.
    pub fn export(&mut self) -> ExportChannels<'_, 'a, T> {
        ExportChannels {
            store: self,
            next: CHANNEL_MIN,
        }
    }

    /// Program the radio to exactly the contents of the import set:
    /// every slot present in the set is written, every other slot is
    /// erased, and the radio is reset afterwards.
    pub async fn import_all(&mut self, set: &ImportSet) -> RadioResult<()> {
        for number in CHANNEL_MIN..=CHANNEL_MAX {
            if number % 11 == 0 {
                tracing::info!(
                    "importing CH-{:03}...CH-{:03} ({:3.0}%)",
                    number - 10,
                    number,
                    number as f32 / CHANNEL_MAX as f32 * 100.0
                );
            }

            match set.get(number) {
                Some(channel) => self.put(channel).await?,
                None => self.erase(number).await?,
            }
        }

        tracing::info!("done.");
        self.link.reset().await
    }
}

/// Lazy export sequence over channels 1..=198, yielding only programmed
/// slots.
pub struct ExportChannels<'s, 'a, T: Transport> {
    store: &'s mut ChannelStore<'a, T>,
    next: u8,
}

impl<T: Transport> ExportChannels<'_, '_, T> {
    /// Fetch the next programmed channel, or `None` once the whole range
    /// has been read.
    pub async fn next_channel(&mut self) -> RadioResult<Option<Channel>> {
        while self.next <= CHANNEL_MAX {
            let number = self.next;
            self.next += 1;

            if number % 11 == 0 {
                tracing::info!(
                    "exporting CH-{:03}...CH-{:03} ({:3.0}%)",
                    number - 10,
                    number,
                    number as f32 / CHANNEL_MAX as f32 * 100.0
                );
            }

            if let Some(channel) = self.store.get(number).await? {
                return Ok(Some(channel));
            }
        }
        Ok(None)
    }
}

/// Bulk-import working set: channel number -> target record, fully built
/// and validated before the first device write.
#[derive(Debug, Default)]
pub struct ImportSet {
    channels: BTreeMap<u8, Channel>,
}

impl ImportSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record keyed by its channel number; a second record for
    /// the same channel is a validation error.
    pub fn insert(&mut self, channel: Channel) -> Result<(), ValidationError> {
        let number = channel.number;
        if self.channels.contains_key(&number) {
            return Err(ValidationError::DuplicateChannel(number));
        }
        self.channels.insert(number, channel);
        Ok(())
    }

    pub fn get(&self, number: u8) -> Option<&Channel> {
        self.channels.get(&number)
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}
