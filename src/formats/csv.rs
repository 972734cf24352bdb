//! CSV file format handler for channel import/export
//!
//! Two layouts carry the same 10 columns in the same order: the default
//! comma-delimited form and a fixed-width variant for eyeball-friendly
//! files. Import splits on ',' and trims each field, so both layouts
//! read back through the same path.

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use thiserror::Error;

use crate::core::validation::{
    check_channel_number, check_frequency, check_groups, check_name, check_power, check_subtone,
    parse_number, ValidationError,
};
use crate::core::{Bandwidth, Channel, Modulation};
use crate::radio::ImportSet;

const FIELD_COUNT: usize = 10;

const HEADER: &str = "Channel number,Name,Rx frequency,Tx frequency,Rx subtone,Tx subtone,Tx power,Groups,Bandwidth,Modulation";

const FIXED_WIDTH_HEADER: &str =
    "CH#,Name        ,  Rx freq,  Tx freq,RxSub,TxSub,PWR,Grp ,Bwidth,Modulation";

#[derive(Error, Debug)]
pub enum CsvError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File is empty")]
    Empty,

    #[error("Line {line} has an incorrect number of fields ({count} instead of {FIELD_COUNT})")]
    FieldCount { line: usize, count: usize },

    #[error("Import failed on line {line}: {source}")]
    Field {
        line: usize,
        #[source]
        source: ValidationError,
    },
}

pub type Result<T> = std::result::Result<T, CsvError>;

/// Channel table writer. The header goes out on construction; rows are
/// appended one at a time so a device export can stream through without
/// collecting the whole table first.
pub struct CsvWriter<W: Write> {
    out: W,
    fixed_width: bool,
}

impl CsvWriter<File> {
    pub fn create(path: impl AsRef<Path>, fixed_width: bool) -> Result<Self> {
        Self::new(File::create(path)?, fixed_width)
    }
}

impl<W: Write> CsvWriter<W> {
    pub fn new(mut out: W, fixed_width: bool) -> Result<Self> {
        let header = if fixed_width { FIXED_WIDTH_HEADER } else { HEADER };
        writeln!(out, "{}", header)?;
        Ok(Self { out, fixed_width })
    }

    pub fn write_channel(&mut self, channel: &Channel) -> Result<()> {
        if self.fixed_width {
            writeln!(
                self.out,
                "{:03},{:<12},{:>9},{:>9},{:>5},{:>5},{:>3},{:<4},{:<6},{:<4}",
                channel.number,
                channel.name,
                channel.rx_freq,
                channel.tx_freq,
                channel.rx_subtone,
                channel.tx_subtone,
                channel.tx_power,
                channel.groups.to_string(),
                channel.bandwidth.to_string(),
                channel.modulation.to_string(),
            )?;
        } else {
            writeln!(
                self.out,
                "{},{},{},{},{},{},{},{},{},{}",
                channel.number,
                channel.name,
                channel.rx_freq,
                channel.tx_freq,
                channel.rx_subtone,
                channel.tx_subtone,
                channel.tx_power,
                channel.groups,
                channel.bandwidth,
                channel.modulation,
            )?;
        }
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Parse one data row into a validated channel record.
fn parse_row(line: &str, line_number: usize) -> Result<Channel> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() != FIELD_COUNT {
        return Err(CsvError::FieldCount {
            line: line_number,
            count: fields.len(),
        });
    }

    let at_line = |source: ValidationError| CsvError::Field {
        line: line_number,
        source,
    };

    let number =
        check_channel_number(parse_number("Channel number", fields[0]).map_err(at_line)?)
            .map_err(at_line)?;
    let name = check_name(fields[1].trim_end_matches(' '));
    let rx_freq =
        check_frequency(parse_number("Frequency", fields[2]).map_err(at_line)?).map_err(at_line)?;
    let tx_freq =
        check_frequency(parse_number("Frequency", fields[3]).map_err(at_line)?).map_err(at_line)?;
    let rx_subtone =
        check_subtone(parse_number("Subtone", fields[4]).map_err(at_line)?).map_err(at_line)?;
    let tx_subtone =
        check_subtone(parse_number("Subtone", fields[5]).map_err(at_line)?).map_err(at_line)?;
    let tx_power =
        check_power(parse_number("Power", fields[6]).map_err(at_line)?).map_err(at_line)?;
    let groups = check_groups(fields[7].trim()).map_err(at_line)?;
    let bandwidth = fields[8].trim().parse::<Bandwidth>().map_err(at_line)?;
    let modulation = fields[9].trim().parse::<Modulation>().map_err(at_line)?;

    Ok(Channel {
        number,
        name,
        rx_freq,
        tx_freq,
        rx_subtone,
        tx_subtone,
        tx_power,
        groups,
        modulation,
        bandwidth,
    })
}

/// Parse a whole channel file into an import working set. The header row
/// is always skipped; a file without even a header is rejected, so an
/// accidental empty file cannot wipe every channel on the device. Any
/// malformed row fails the entire import; nothing is handed to the device
/// until this function has succeeded.
pub fn import_csv(path: impl AsRef<Path>) -> Result<ImportSet> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut set = ImportSet::new();
    let mut saw_header = false;

    for (index, line) in reader.lines().enumerate() {
        let line_number = index + 1;
        let line = line?;

        // first line is the header
        if line_number == 1 {
            saw_header = true;
            continue;
        }

        let channel = parse_row(&line, line_number)?;
        set.insert(channel).map_err(|source| CsvError::Field {
            line: line_number,
            source,
        })?;
    }

    if !saw_header {
        return Err(CsvError::Empty);
    }

    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use tempfile::NamedTempFile;

    fn sample_channel(number: u8) -> Channel {
        Channel {
            number,
            name: format!("CH-{:03}", number),
            rx_freq: 14_500_000,
            tx_freq: 14_500_000,
            rx_subtone: 0,
            tx_subtone: 885,
            tx_power: 10,
            groups: check_groups("AB00").unwrap(),
            modulation: Modulation::Auto,
            bandwidth: Bandwidth::Wide,
        }
    }

    fn write_temp(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_comma_row_format() {
        let mut writer = CsvWriter::new(Vec::new(), false).unwrap();
        writer.write_channel(&sample_channel(5)).unwrap();
        let text = String::from_utf8(writer.into_inner()).unwrap();

        let mut lines = text.lines();
        assert_eq!(lines.next().unwrap(), HEADER);
        assert_eq!(
            lines.next().unwrap(),
            "5,CH-005,14500000,14500000,0,885,10,AB00,Wide,Auto"
        );
    }

    #[test]
    fn test_fixed_width_row_format() {
        let mut writer = CsvWriter::new(Vec::new(), true).unwrap();
        writer.write_channel(&sample_channel(5)).unwrap();
        let text = String::from_utf8(writer.into_inner()).unwrap();

        let mut lines = text.lines();
        assert_eq!(lines.next().unwrap(), FIXED_WIDTH_HEADER);
        assert_eq!(
            lines.next().unwrap(),
            "005,CH-005      , 14500000, 14500000,    0,  885, 10,AB00,Wide  ,Auto"
        );
    }

    #[test]
    fn test_import_both_layouts() {
        for fixed_width in [false, true] {
            let mut writer = CsvWriter::new(Vec::new(), fixed_width).unwrap();
            writer.write_channel(&sample_channel(5)).unwrap();
            writer.write_channel(&sample_channel(198)).unwrap();
            let text = String::from_utf8(writer.into_inner()).unwrap();

            let file = write_temp(&text);
            let set = import_csv(file.path()).unwrap();
            assert_eq!(set.len(), 2);
            assert_eq!(set.get(5).unwrap(), &sample_channel(5));
            assert_eq!(set.get(198).unwrap(), &sample_channel(198));
        }
    }

    #[test]
    fn test_import_skips_header_only_file() {
        let file = write_temp("any header at all\n");
        let set = import_csv(file.path()).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_import_rejects_empty_file() {
        let file = write_temp("");
        match import_csv(file.path()) {
            Err(CsvError::Empty) => {}
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_import_rejects_wrong_field_count() {
        let file = write_temp(&format!(
            "{}\n5,CH-005,14500000,14500000,0,885,10,AB00,Wide,Auto,surplus\n",
            HEADER
        ));
        match import_csv(file.path()) {
            Err(CsvError::FieldCount { line: 2, count: 11 }) => {}
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_import_rejects_bad_field_with_line_number() {
        let file = write_temp(&format!(
            "{}\n5,CH-005,14500000,14500000,0,885,10,AB00,Wide,Auto\n6,CH-006,1799999,14500000,0,0,10,AB00,Wide,Auto\n",
            HEADER
        ));
        match import_csv(file.path()) {
            Err(CsvError::Field { line: 3, source }) => {
                assert_eq!(source, ValidationError::Frequency(1_799_999));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_import_rejects_duplicate_channel() {
        let row = "5,CH-005,14500000,14500000,0,885,10,AB00,Wide,Auto";
        let file = write_temp(&format!("{}\n{}\n{}\n", HEADER, row, row));
        match import_csv(file.path()) {
            Err(CsvError::Field { line: 3, source }) => {
                assert_eq!(source, ValidationError::DuplicateChannel(5));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_import_then_export_round_trips_through_device() {
        use crate::core::constants::{CHANNEL_MAX, CHANNEL_MIN, RECORD_SIZE};
        use crate::core::checksum;
        use crate::radio::protocol::{
            CMD_DISABLE_RADIO, CMD_ENABLE_RADIO, CMD_WRITE_CHANNEL,
        };
        use crate::radio::{ChannelStore, RadioLink};
        use crate::serial::mock::MockTransport;

        // a 3-row file covering the range boundaries and one middle slot
        let mut writer = CsvWriter::new(Vec::new(), false).unwrap();
        for number in [1, 50, 198] {
            writer.write_channel(&sample_channel(number)).unwrap();
        }
        let exported = String::from_utf8(writer.into_inner()).unwrap();
        let file = write_temp(&exported);

        let set = import_csv(file.path()).unwrap();
        assert_eq!(set.len(), 3);

        // drive the import against a scripted device
        let import_mock = MockTransport::new();
        for _ in CHANNEL_MIN..=CHANNEL_MAX {
            import_mock.push_read_data(&[CMD_DISABLE_RADIO, CMD_WRITE_CHANNEL, CMD_ENABLE_RADIO]);
        }
        let mut link = RadioLink::new(import_mock.clone());
        ChannelStore::new(&mut link).import_all(&set).await.unwrap();

        // replay the payloads the import put on the wire as read responses,
        // then export and compare the files
        let written = import_mock.written_data();
        let export_mock = MockTransport::new();
        for index in 0..CHANNEL_MAX as usize {
            let frame = &written[index * 37..(index + 1) * 37];
            let payload: &[u8; RECORD_SIZE] = frame[3..35].try_into().unwrap();
            export_mock.push_read_data(&[CMD_DISABLE_RADIO]);
            export_mock.push_read_data(payload);
            export_mock.push_read_data(&[checksum(payload)]);
            export_mock.push_read_data(&[CMD_ENABLE_RADIO]);
        }

        let mut link = RadioLink::new(export_mock);
        let mut store = ChannelStore::new(&mut link);
        let mut writer = CsvWriter::new(Vec::new(), false).unwrap();
        let mut export = store.export();
        while let Some(channel) = export.next_channel().await.unwrap() {
            writer.write_channel(&channel).unwrap();
        }

        let round_tripped = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(round_tripped, exported);
    }

    #[tokio::test]
    async fn test_malformed_import_never_touches_the_device() {
        use crate::serial::mock::MockTransport;

        let file = write_temp(&format!(
            "{}\n1,CH-001,14500000,14500000,0,0,10,AB00,Wide,Auto\n50,CH-050,14500000,14500000,0,0,10,,AB00,Wide,Auto\n",
            HEADER
        ));

        // parse phase fails on the 11-field row, so the device is never
        // written to
        let mock = MockTransport::new();
        assert!(matches!(
            import_csv(file.path()),
            Err(CsvError::FieldCount { line: 3, count: 11 })
        ));
        assert!(mock.written_data().is_empty());
    }

    #[test]
    fn test_import_trims_padded_fields() {
        let file = write_temp(&format!(
            "{}\n005,PADDED      , 14500000, 14500000,    0,  885, 10,AB00,Wide  ,Auto\n",
            FIXED_WIDTH_HEADER
        ));
        let set = import_csv(file.path()).unwrap();
        let channel = set.get(5).unwrap();
        assert_eq!(channel.name, "PADDED");
        assert_eq!(channel.rx_freq, 14_500_000);
        assert_eq!(channel.bandwidth, Bandwidth::Wide);
    }
}
