//! Merging of records that lie close together in the secondary genome.

use crate::Locus;
use crate::alignment::Record;

/// Records whose secondary loci lie within a merge distance of each other.
#[derive(Debug)]
pub(crate) struct Merge<'r, P> {
    /// The smallest locus covering every member's secondary locus.
    pub(crate) locus: Locus,

    /// The members in secondary genome order.
    pub(crate) records: Vec<&'r Record<P>>,
}

/// Merges `records` whose secondary loci are at most `distance` bases apart.
///
/// Records are visited in secondary genome order (stable for equal starts), so
/// merging is transitive: a record joins the current merge whenever it starts
/// within `distance` of the furthest end seen so far on the same chromosome.
pub(crate) fn merge<P>(records: &[Record<P>], distance: f64) -> Vec<Merge<'_, P>> {
    let mut sorted = records.iter().collect::<Vec<_>>();
    sorted.sort_by(|a, b| {
        let (a, b) = (a.secondary(), b.secondary());
        a.chromosome()
            .cmp(b.chromosome())
            .then(a.start().cmp(&b.start()))
    });

    let mut merges: Vec<Merge<'_, P>> = Vec::new();

    for record in sorted {
        let locus = record.secondary();

        if let Some(current) = merges.last_mut() {
            let within = locus.start() as f64 - current.locus.end() as f64 <= distance;

            if within {
                if let Some(hull) = current.locus.hull(locus) {
                    current.locus = hull;
                    current.records.push(record);
                    continue;
                }
            }
        }

        merges.push(Merge {
            locus: locus.clone(),
            records: vec![record],
        });
    }

    merges
}

#[cfg(test)]
mod tests {
    use omics::coordinate::Strand;

    use super::*;

    fn record(secondary: &str) -> Result<Record<()>, Box<dyn std::error::Error>> {
        Ok(Record::new(
            "chr1:0-100".parse()?,
            secondary.parse()?,
            Strand::Positive,
            (),
        ))
    }

    #[test]
    fn test_merging_depends_on_distance() -> Result<(), Box<dyn std::error::Error>> {
        let records = vec![record("chr2:0-1000")?, record("chr2:1500-2500")?];

        // 10 bases per pixel.
        let merges = merge(&records, 200.0 * 10.0);
        assert_eq!(merges.len(), 1);
        assert_eq!(merges[0].locus.to_string(), "chr2:0-2500");
        assert_eq!(merges[0].records.len(), 2);

        // 1 base per pixel.
        let merges = merge(&records, 200.0);
        assert_eq!(merges.len(), 2);

        Ok(())
    }

    #[test]
    fn test_merging_is_transitive() -> Result<(), Box<dyn std::error::Error>> {
        let records = vec![
            record("chr2:2000-2100")?,
            record("chr2:0-100")?,
            record("chr2:1000-1100")?,
            record("chr3:1100-1200")?,
        ];

        let merges = merge(&records, 900.0);
        assert_eq!(merges.len(), 2);
        assert_eq!(merges[0].locus.to_string(), "chr2:0-2100");
        assert_eq!(
            merges[0]
                .records
                .iter()
                .map(|record| record.secondary().start())
                .collect::<Vec<_>>(),
            vec![0, 1000, 2000]
        );
        assert_eq!(merges[1].locus.to_string(), "chr3:1100-1200");

        Ok(())
    }

    #[test]
    fn test_overlapping_loci_always_merge() -> Result<(), Box<dyn std::error::Error>> {
        let records = vec![record("chr2:0-1000")?, record("chr2:100-200")?];
        let merges = merge(&records, 0.0);
        assert_eq!(merges.len(), 1);
        assert_eq!(merges[0].locus.to_string(), "chr2:0-1000");
        Ok(())
    }

    #[test]
    fn test_no_records() {
        assert!(merge::<()>(&[], 100.0).is_empty());
    }
}
