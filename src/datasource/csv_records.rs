//! CSV readers for forwarding history and channel info.

use super::{read_input_bytes, IngestError};
use crate::domain::{ChannelId, ChannelInfo, ForwardEvent, TimestampNs};
use std::collections::HashMap;
use std::path::Path;

pub type ChannelInfoMap = HashMap<ChannelId, ChannelInfo>;

fn malformed(err: csv::Error) -> IngestError {
    let line = err.position().map(|p| p.line()).unwrap_or(0);
    match err.kind() {
        csv::ErrorKind::Deserialize { err, .. } => IngestError::MalformedRecord {
            line,
            reason: err.to_string(),
        },
        csv::ErrorKind::UnequalLengths { .. } => IngestError::MalformedRecord {
            line,
            reason: "wrong number of fields".to_string(),
        },
        _ => IngestError::Csv(err.to_string()),
    }
}

fn reader(csv_bytes: &[u8]) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(csv_bytes)
}

/// Parse forwarding events from CSV with header
/// `timestamp_ns,chan_id_in,chan_id_out,amt_in_msat,amt_out_msat,fee_msat`.
pub fn parse_forwards(csv_bytes: &[u8]) -> Result<Vec<ForwardEvent>, IngestError> {
    #[derive(Debug, serde::Deserialize)]
    struct Row {
        timestamp_ns: i64,
        chan_id_in: String,
        chan_id_out: String,
        amt_in_msat: u64,
        amt_out_msat: u64,
        fee_msat: u64,
    }

    let mut forwards = Vec::new();
    for record in reader(csv_bytes).deserialize::<Row>() {
        let row = record.map_err(malformed)?;
        forwards.push(ForwardEvent::new(
            TimestampNs::new(row.timestamp_ns),
            &row.chan_id_in,
            &row.chan_id_out,
            row.amt_in_msat,
            row.amt_out_msat,
            row.fee_msat,
        ));
    }
    Ok(forwards)
}

/// Parse channel info from CSV with header `short_channel_id,capacity,max_accepted_htlcs`.
pub fn parse_channel_info(csv_bytes: &[u8]) -> Result<ChannelInfoMap, IngestError> {
    #[derive(Debug, serde::Deserialize)]
    struct Row {
        short_channel_id: String,
        capacity: u64,
        max_accepted_htlcs: u32,
    }

    let mut channels = HashMap::new();
    for record in reader(csv_bytes).deserialize::<Row>() {
        let row = record.map_err(malformed)?;
        let id = ChannelId::new(row.short_channel_id);
        channels.insert(
            id.clone(),
            ChannelInfo::new(id, row.capacity, row.max_accepted_htlcs),
        );
    }
    Ok(channels)
}

pub fn read_forwards(path: &Path) -> Result<Vec<ForwardEvent>, IngestError> {
    let forwards = parse_forwards(&read_input_bytes(path)?)?;
    tracing::info!(path = %path.display(), forwards = forwards.len(), "Loaded forwards");
    Ok(forwards)
}

pub fn read_channel_info(path: &Path) -> Result<ChannelInfoMap, IngestError> {
    let channels = parse_channel_info(&read_input_bytes(path)?)?;
    tracing::info!(path = %path.display(), channels = channels.len(), "Loaded channel info");
    Ok(channels)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "timestamp_ns,chan_id_in,chan_id_out,amt_in_msat,amt_out_msat,fee_msat\n";

    #[test]
    fn csv_parsing_valid_forward() {
        let csv = format!("{HEADER}1700000000500000000, 111x1x0 ,\"222x2x1\",101000,100000,1000\n");
        let forwards = parse_forwards(csv.as_bytes()).unwrap();
        assert_eq!(forwards.len(), 1);
        let fwd = &forwards[0];
        assert_eq!(fwd.timestamp, TimestampNs::new(1_700_000_000_500_000_000));
        assert_eq!(fwd.chan_id_in, Some(ChannelId::from("111x1x0")));
        assert_eq!(fwd.chan_id_out, Some(ChannelId::from("222x2x1")));
        assert_eq!(fwd.amt_in_msat, 101_000);
        assert_eq!(fwd.amt_out_msat, 100_000);
        assert_eq!(fwd.fee_msat, 1_000);
    }

    #[test]
    fn csv_parsing_empty_channel_is_absent() {
        let csv = format!("{HEADER}1,,222x2x1,10,9,1\n");
        let forwards = parse_forwards(csv.as_bytes()).unwrap();
        assert!(forwards[0].chan_id_in.is_none());
    }

    #[test]
    fn csv_parsing_unparseable_field_is_malformed() {
        let csv = format!("{HEADER}1,a,b,10,9,1\nnot-a-time,a,b,10,9,1\n");
        match parse_forwards(csv.as_bytes()) {
            Err(IngestError::MalformedRecord { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected MalformedRecord, got {:?}", other),
        }
    }

    #[test]
    fn csv_parsing_missing_field_is_malformed() {
        let csv = format!("{HEADER}1,a,b,10,9\n");
        assert!(matches!(
            parse_forwards(csv.as_bytes()),
            Err(IngestError::MalformedRecord { .. })
        ));
    }

    #[test]
    fn csv_parsing_empty_file() {
        assert!(parse_forwards(HEADER.as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn csv_parsing_channel_info() {
        let csv = b"short_channel_id,capacity,max_accepted_htlcs\n111x1x0,5000000,483\n222x2x1,100000,30\n";
        let info = parse_channel_info(csv).unwrap();
        assert_eq!(info.len(), 2);
        let chan = &info[&ChannelId::from("111x1x0")];
        assert_eq!(chan.capacity_sat, 5_000_000);
        assert_eq!(chan.max_accepted_htlcs, 483);
    }
}
