use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;

#[derive(Deserialize)]
struct Range {
    #[serde(rename = "entityId")]
    entity_id: String,
    #[serde(rename = "endOfRange")]
    end_of_range: u64,
}

/// Bucket ranges of an experiment, keyed by their inclusive upper bound
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrafficAllocation(BTreeMap<u64, String>);

impl TrafficAllocation {
    pub fn from_ranges<I, S>(ranges: I) -> Self
    where
        I: IntoIterator<Item = (u64, S)>,
        S: Into<String>,
    {
        let mut tree = BTreeMap::new();
        for (end_of_range, entity_id) in ranges {
            // A later range ending at the same bound has zero width
            tree.entry(end_of_range).or_insert_with(|| entity_id.into());
        }
        Self(tree)
    }

    /// Entity id of the first range whose upper bound is at or above `bucket_value`.
    /// Unallocated ranges (empty entity id) and buckets past the last range yield `None`.
    pub fn variation(&self, bucket_value: u64) -> Option<&str> {
        self.0
            .range(bucket_value..)
            .next()
            .map(|(_, entity_id)| entity_id.as_str())
            .filter(|entity_id| !entity_id.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for TrafficAllocation {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let ranges = Vec::<Range>::deserialize(deserializer)?;
        Ok(Self::from_ranges(
            ranges.into_iter().map(|r| (r.end_of_range, r.entity_id)),
        ))
    }
}
