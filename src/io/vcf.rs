use std::fs::File;
use std::io::{
    BufRead,
    BufReader,
    Read,
};
use std::path::Path;

use anyhow::Context;
use flate2::read::MultiGzDecoder;
use itertools::Itertools;
use log::{
    debug,
    info,
    warn,
};
use noodles::vcf;
use noodles::vcf::variant::record::samples::series::value::genotype::Phasing;
use noodles::vcf::variant::record_buf::info::field::value::Array as InfoArray;
use noodles::vcf::variant::record_buf::info::field::Value as InfoValue;
use noodles::vcf::variant::record_buf::samples::sample::value::{
    Array as SampleArray,
    Genotype,
};
use noodles::vcf::variant::record_buf::samples::sample::Value as SampleValue;
use noodles::vcf::variant::RecordBuf;

use crate::data_structs::{
    RawValue,
    VariantRow,
};
use crate::features::VariantDecoder;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Read access to one VCF record.
///
/// Tag lookups return `None` when the tag is absent, a present tag without
/// value is `Some(RawValue::Missing)`.
pub trait VariantRecord {
    fn chrom(&self) -> &str;
    /// 1-based position.
    fn position(&self) -> Option<usize>;
    fn reference(&self) -> &str;
    fn alternates(&self) -> Vec<&str>;
    /// Filter names as written in the FILTER column.
    fn filters(&self) -> Vec<&str>;
    fn info(
        &self,
        key: &str,
    ) -> Option<RawValue>;
    /// FORMAT value of the first sample.
    fn sample(
        &self,
        key: &str,
    ) -> Option<RawValue>;
}

impl VariantRecord for RecordBuf {
    fn chrom(&self) -> &str {
        self.reference_sequence_name()
    }

    fn position(&self) -> Option<usize> {
        self.variant_start().map(usize::from)
    }

    fn reference(&self) -> &str {
        self.reference_bases()
    }

    fn alternates(&self) -> Vec<&str> {
        self.alternate_bases()
            .as_ref()
            .iter()
            .map(String::as_str)
            .collect()
    }

    fn filters(&self) -> Vec<&str> {
        self.filters()
            .as_ref()
            .iter()
            .map(String::as_str)
            .collect()
    }

    fn info(
        &self,
        key: &str,
    ) -> Option<RawValue> {
        self.info()
            .get(key)
            .map(|value| value.map(RawValue::from).unwrap_or(RawValue::Missing))
    }

    fn sample(
        &self,
        key: &str,
    ) -> Option<RawValue> {
        self.samples()
            .get_index(0)
            .and_then(|sample| sample.get(key))
            .map(|value| value.map(RawValue::from).unwrap_or(RawValue::Missing))
    }
}

fn widen_ints(values: &[Option<i32>]) -> Vec<Option<i64>> {
    values.iter().map(|v| v.map(i64::from)).collect()
}

fn widen_floats(values: &[Option<f32>]) -> Vec<Option<f64>> {
    values.iter().map(|v| v.map(f64::from)).collect()
}

impl From<&InfoValue> for RawValue {
    fn from(value: &InfoValue) -> Self {
        match value {
            InfoValue::Integer(v) => RawValue::Integer(i64::from(*v)),
            InfoValue::Float(v) => RawValue::Float(f64::from(*v)),
            InfoValue::Flag => RawValue::Flag,
            InfoValue::Character(c) => RawValue::String(c.to_string()),
            InfoValue::String(s) => RawValue::String(s.clone()),
            InfoValue::Array(InfoArray::Integer(v)) => RawValue::IntegerArray(widen_ints(v)),
            InfoValue::Array(InfoArray::Float(v)) => RawValue::FloatArray(widen_floats(v)),
            InfoValue::Array(InfoArray::Character(v)) => {
                RawValue::StringArray(v.iter().map(|c| c.map(|c| c.to_string())).collect())
            },
            InfoValue::Array(InfoArray::String(v)) => RawValue::StringArray(v.clone()),
        }
    }
}

impl From<&SampleValue> for RawValue {
    fn from(value: &SampleValue) -> Self {
        match value {
            SampleValue::Integer(v) => RawValue::Integer(i64::from(*v)),
            SampleValue::Float(v) => RawValue::Float(f64::from(*v)),
            SampleValue::Character(c) => RawValue::String(c.to_string()),
            SampleValue::String(s) => RawValue::String(s.clone()),
            SampleValue::Genotype(gt) => RawValue::String(genotype_string(gt)),
            SampleValue::Array(SampleArray::Integer(v)) => {
                RawValue::IntegerArray(widen_ints(v))
            },
            SampleValue::Array(SampleArray::Float(v)) => {
                RawValue::FloatArray(widen_floats(v))
            },
            SampleValue::Array(SampleArray::Character(v)) => {
                RawValue::StringArray(v.iter().map(|c| c.map(|c| c.to_string())).collect())
            },
            SampleValue::Array(SampleArray::String(v)) => RawValue::StringArray(v.clone()),
        }
    }
}

/// Renders a parsed genotype back to its `GT` text, e.g. `0|1` or `./1`.
pub(crate) fn genotype_string(gt: &Genotype) -> String {
    gt.as_ref()
        .iter()
        .enumerate()
        .fold(String::new(), |mut acc, (i, allele)| {
            if i > 0 {
                acc.push(match allele.phasing() {
                    Phasing::Phased => '|',
                    Phasing::Unphased => '/',
                });
            }
            match allele.position() {
                Some(p) => acc.push_str(&p.to_string()),
                None => acc.push('.'),
            }
            acc
        })
}

/// Opens plain or gzip/BGZF compressed text, detected by the gzip magic.
pub fn open_maybe_gzip<P: AsRef<Path>>(path: P) -> anyhow::Result<Box<dyn BufRead>> {
    let path = path.as_ref();
    let mut handle = BufReader::new(
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?,
    );
    let is_gzip = handle.fill_buf()?.starts_with(&GZIP_MAGIC);
    if is_gzip {
        debug!("Detected gzip compression for {}", path.display());
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(handle))))
    }
    else {
        Ok(Box::new(handle))
    }
}

/// Sequential VCF reader producing decoded [`VariantRow`]s.
pub struct VcfReader {
    reader: vcf::io::Reader<Box<dyn BufRead>>,
    header: vcf::Header,
}

impl VcfReader {
    /// Opens a VCF file, gzip or BGZF compression is detected automatically.
    pub fn from_path<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let handle = open_maybe_gzip(path)?;
        let reader = Self::new(handle)
            .with_context(|| format!("Failed to read VCF header of {}", path.display()))?;
        info!("Opened VCF {}", path.display());
        Ok(reader)
    }

    /// Wraps an uncompressed VCF stream and reads its header.
    pub fn new<R: Read + 'static>(handle: R) -> anyhow::Result<Self> {
        let handle: Box<dyn BufRead> = Box::new(BufReader::new(handle));
        let mut reader = vcf::io::Reader::new(handle);
        let header = reader.read_header()?;
        if header.sample_names().is_empty() {
            warn!("VCF has no samples, every FORMAT feature takes its default");
        }
        else if header.sample_names().len() > 1 {
            warn!(
                "VCF has {} samples, only {} is used",
                header.sample_names().len(),
                header.sample_names().iter().next().map(String::as_str).unwrap_or("")
            );
        }
        Ok(Self { reader, header })
    }

    pub fn header(&self) -> &vcf::Header {
        &self.header
    }

    /// Decodes every remaining record in file order.
    pub fn decode_all(
        &mut self,
        decoder: &VariantDecoder,
    ) -> anyhow::Result<Vec<VariantRow>> {
        let mut rows = Vec::new();
        for (idx, result) in self.reader.record_bufs(&self.header).enumerate() {
            let record =
                result.with_context(|| format!("Failed to parse VCF record #{}", idx + 1))?;
            rows.push(decoder.decode(&record)?);
        }
        info!("Decoded {} variants", rows.len());
        debug!(
            "Chromosomes: {}",
            rows.iter().map(|r| r.chrom.as_str()).dedup().join(", ")
        );
        Ok(rows)
    }
}
