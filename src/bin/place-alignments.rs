//! A binary to lay out paired-genome alignments across a set of primary
//! genome regions and print the resulting placements.
//!
//! ```shell
//! cargo run --release --bin=place-alignments --features=binaries -- \
//!     alignments.tsv.gz --region chr1:1,000,000-1,200,000 --width 1200
//! ```
//!
//! The input is a tab-delimited file (optionally gzip-compressed, detected by
//! a `.gz` extension) with the following columns:
//!
//! ```text
//! primary_chrom  primary_start  primary_end  secondary_chrom  secondary_start  secondary_end  strand  [name]
//! ```
//!
//! Blank lines and lines starting with `#` are ignored. Malformed lines are
//! reported and skipped.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use clap::Parser;
use clap_verbosity_flag::Verbosity;
use flate2::read::GzDecoder;
use omics::coordinate::Strand;
use omics::coordinate::position::Number;
use tabled::builder::Builder;
use tabled::settings::Alignment;
use tabled::settings::Style;
use tabled::settings::object::Rows;
use tracing::info;
use tracing::warn;
use tracing_log::AsTrace as _;
use tracing_subscriber::EnvFilter;
use tracklayout::Locus;
use tracklayout::alignment::Layout;
use tracklayout::alignment::Placer;
use tracklayout::alignment::Record;
use tracklayout::draw::DrawProjector;
use tracklayout::index::IntervalIndex;
use tracklayout::space::CoordinateSpace;
use tracklayout::span::AddressSpan;

/// The payload carried by each record: an optional name.
type Name = Option<String>;

////////////////////////////////////////////////////////////////////////////////////////
// Records
////////////////////////////////////////////////////////////////////////////////////////

/// Parses a single tab-delimited line into a record.
fn parse_record(line: &str) -> Result<Record<Name>> {
    let fields = line.split('\t').collect::<Vec<_>>();

    if fields.len() < 7 {
        bail!("expected at least 7 columns, found {}", fields.len());
    }

    let locus = |chromosome: &str, start: &str, end: &str| -> Result<Locus> {
        let start = start
            .parse::<Number>()
            .with_context(|| format!("parsing start position `{start}`"))?;
        let end = end
            .parse::<Number>()
            .with_context(|| format!("parsing end position `{end}`"))?;

        Locus::try_new(chromosome, start, end).context("creating locus")
    };

    let primary = locus(fields[0], fields[1], fields[2]).context("primary locus")?;
    let secondary = locus(fields[3], fields[4], fields[5]).context("secondary locus")?;
    let strand = fields[6]
        .parse::<Strand>()
        .with_context(|| format!("parsing strand `{}`", fields[6]))?;
    let name = fields
        .get(7)
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .map(String::from);

    Ok(Record::new(primary, secondary, strand, name))
}

/// Reads every well-formed record from `reader`.
fn read_records(reader: impl BufRead) -> Result<Vec<Record<Name>>> {
    let mut records = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("reading line {}", i + 1))?;
        let line = line.trim_end();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match parse_record(line) {
            Ok(record) => records.push(record),
            Err(err) => warn!("skipping line {}: {err:#}", i + 1),
        }
    }

    Ok(records)
}

#[cfg(test)]
mod record_tests {
    use super::*;

    #[test]
    fn valid() {
        let record = parse_record("chr1\t100\t200\tchr7\t5000\t5100\t-\tblock").unwrap();
        assert_eq!(record.primary().to_string(), "chr1:100-200");
        assert_eq!(record.secondary().to_string(), "chr7:5000-5100");
        assert_eq!(record.strand(), &Strand::Negative);
        assert_eq!(record.payload().as_deref(), Some("block"));

        let record = parse_record("chr1\t100\t200\tchr7\t5000\t5100\t+").unwrap();
        assert_eq!(record.payload(), &None);
    }

    #[test]
    fn invalid() {
        assert!(parse_record("chr1\t100\t200").is_err());
        assert!(parse_record("chr1\t200\t100\tchr7\t5000\t5100\t+").is_err());
        assert!(parse_record("chr1\t100\t200\tchr7\tfoo\t5100\t+").is_err());
        assert!(parse_record("chr1\t100\t200\tchr7\t5000\t5100\t?").is_err());
    }

    #[test]
    fn skips_malformed_lines() {
        let data = b"# comment\nchr1\t1\t2\tchr2\t1\t2\t+\n\nbad line\nchr1\t5\t9\tchr2\t5\t9\t-\tx\n";
        let records = read_records(&data[..]).unwrap();
        assert_eq!(records.len(), 2);
    }
}

////////////////////////////////////////////////////////////////////////////////////////
// Visible records
////////////////////////////////////////////////////////////////////////////////////////

/// Resolves the address window to draw: the extent of `locus` within `space`,
/// or the whole space when no locus is given.
fn window(space: &CoordinateSpace, locus: Option<&Locus>) -> Result<AddressSpan> {
    let Some(locus) = locus else {
        return Ok(AddressSpan::new(0, space.total_length()));
    };

    let spans = space.to_address(locus);

    match (spans.first(), spans.last()) {
        (Some(first), Some(last)) => Ok(AddressSpan::new(first.start, last.end)),
        _ => bail!("window `{locus}` does not overlap any region"),
    }
}

/// Selects the records whose primary loci overlap `window`, in input order.
///
/// Each record is indexed once per piece of its primary locus in `space`;
/// records with no piece in `space` are never selected.
fn visible_records(
    records: Vec<Record<Name>>,
    space: &CoordinateSpace,
    window: AddressSpan,
) -> Result<Vec<Record<Name>>> {
    let mut index = IntervalIndex::try_new(space.total_length() as f64 / 2.0)
        .context("creating the record index")?;
    let mut owners = Vec::new();

    for (i, record) in records.iter().enumerate() {
        for span in space.to_address(record.primary()) {
            let interval = index
                .insert(span.start, span.end, None)
                .context("indexing a record")?;

            let id = interval.id() as usize;
            if owners.len() <= id {
                owners.resize(id + 1, usize::MAX);
            }
            owners[id] = i;
        }
    }

    let visible = index
        .range_query(window.start, window.end)
        .context("querying the record index")?
        .into_iter()
        .map(|hit| owners[hit.interval().id() as usize])
        .collect::<BTreeSet<_>>();

    Ok(records
        .into_iter()
        .enumerate()
        .filter(|(i, _)| visible.contains(i))
        .map(|(_, record)| record)
        .collect())
}


////////////////////////////////////////////////////////////////////////////////////////
// Output
////////////////////////////////////////////////////////////////////////////////////////

/// Renders the placed groups as a table.
fn render(layout: &Layout<'_, Name>) -> String {
    let mut builder = Builder::default();
    builder.push_record([
        "Group",
        "Secondary",
        "Group span",
        "Name",
        "Primary",
        "Strand",
        "Primary span",
        "Secondary span",
    ]);

    for (i, group) in layout.groups().iter().enumerate() {
        let number = (i + 1).to_string();

        for member in group.members().iter() {
            let record = member.record();

            builder.push_record([
                number.as_str(),
                &group.secondary_locus().to_string(),
                &group.pixel_span().to_string(),
                record.payload().as_deref().unwrap_or("<None>"),
                &record.primary().to_string(),
                &record.strand().to_string(),
                &member.primary_span().to_string(),
                &member.secondary_span().to_string(),
            ]);
        }
    }

    builder
        .build()
        .with(Style::rounded())
        .modify(Rows::new(1..), Alignment::left())
        .to_string()
}

////////////////////////////////////////////////////////////////////////////////////////
// Main
////////////////////////////////////////////////////////////////////////////////////////

/// Lays out paired-genome alignments across regions of the primary genome.
#[derive(Parser)]
struct Args {
    /// The tab-delimited alignment records (may be gzipped).
    records: PathBuf,

    /// A region of the primary genome to draw (e.g., `chr1:1,000-2,000`). May
    /// be repeated; regions are drawn left to right in the order given.
    #[arg(short, long = "region", required = true)]
    regions: Vec<Locus>,

    /// A locus within the regions to use as the visible window (e.g.,
    /// `chr1:1,500-1,800`). Defaults to every region.
    #[arg(long)]
    window: Option<Locus>,

    /// The number of bases of filler placed between consecutive regions.
    #[arg(short, long, default_value_t = 0)]
    gap: Number,

    /// The draw width in pixels.
    #[arg(short, long, default_value_t = 1_000.0)]
    width: f64,

    /// The distance, in pixels, within which secondary loci are merged.
    #[arg(long, default_value_t = tracklayout::alignment::MERGE_PIXEL_DISTANCE)]
    merge_pixel_distance: f64,

    /// The space, in pixels, kept free around each placed group.
    #[arg(long, default_value_t = tracklayout::alignment::MARGIN)]
    margin: f64,

    /// The minimum width, in pixels, of a group worth drawing.
    #[arg(long, default_value_t = tracklayout::alignment::MIN_DRAW_WIDTH)]
    min_draw_width: f64,

    /// Also print the coordinate space synthesized for the secondary genome.
    #[arg(short, long, default_value_t = false)]
    secondary_space: bool,

    #[command(flatten)]
    verbose: Verbosity,
}

/// Builds the primary coordinate space out of the requested regions.
fn primary_space(regions: &[Locus], gap: Number) -> Result<CoordinateSpace> {
    let mut builder = tracklayout::space::Builder::new("primary");

    for (i, region) in regions.iter().enumerate() {
        if i > 0 && gap > 0 {
            builder = builder.push_gap(gap).context("adding a gap")?;
        }

        builder = builder.push_feature(region.clone());
    }

    builder.try_build().context("building the primary space")
}

fn run(args: &Args) -> Result<()> {
    let space = primary_space(&args.regions, args.gap)?;
    info!("primary space: {space}");

    let file = File::open(&args.records)
        .with_context(|| format!("opening {}", args.records.display()))?;

    let records = if args
        .records
        .extension()
        .is_some_and(|extension| extension == "gz")
    {
        read_records(BufReader::new(GzDecoder::new(file)))
    } else {
        read_records(BufReader::new(file))
    }
    .context("reading records")?;

    let window = window(&space, args.window.as_ref())?;
    info!("visible window: {window}");

    let total = records.len();
    let records = visible_records(records, &space, window)?;
    info!("{} of {total} records are visible", records.len());

    let projector =
        DrawProjector::try_new(&space, window, args.width).context("configuring the view")?;
    let placer = Placer::builder()
        .merge_pixel_distance(args.merge_pixel_distance)
        .margin(args.margin)
        .min_draw_width(args.min_draw_width)
        .try_build()
        .context("configuring the placer")?;

    let layout = placer.place(&records, &projector);

    for dropped in layout.dropped() {
        info!(
            "dropped {} ({} records): {}",
            dropped.secondary_locus(),
            dropped.records().len(),
            dropped.reason()
        );
    }

    println!("{}", render(&layout));

    if args.secondary_space {
        let secondary = layout
            .secondary_space("secondary")
            .context("building the secondary space")?;
        println!("{secondary}");
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    match std::env::var("RUST_LOG") {
        Ok(_) => tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .init(),
        Err(_) => tracing_subscriber::fmt()
            .with_max_level(args.verbose.log_level_filter().as_trace())
            .init(),
    };

    run(&args)
}
