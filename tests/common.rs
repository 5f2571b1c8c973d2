#![allow(dead_code)]
use std::fs::File;
use std::io::Write;
use std::path::Path;

use flate2::write::GzEncoder;
use flate2::Compression;

const HEADER: &str = "\
##fileformat=VCFv4.2
##FILTER=<ID=PASS,Description=\"All filters passed\">
##FILTER=<ID=weak_evidence,Description=\"Mutation does not meet likelihood threshold\">
##INFO=<ID=GERMQ,Number=1,Type=Integer,Description=\"Phred-scaled quality that alt alleles are not germline variants\">
##INFO=<ID=MBQ,Number=R,Type=Integer,Description=\"median base quality by allele\">
##INFO=<ID=MFRL,Number=R,Type=Integer,Description=\"median fragment length by allele\">
##INFO=<ID=MMQ,Number=R,Type=Integer,Description=\"median mapping quality by allele\">
##INFO=<ID=MPOS,Number=A,Type=Integer,Description=\"median distance from end of read\">
##INFO=<ID=PL,Number=1,Type=Integer,Description=\"Normalized likelihood\">
##INFO=<ID=TLOD,Number=A,Type=Float,Description=\"Log 10 likelihood ratio score of variant existing versus not existing\">
##INFO=<ID=all_cohort_af,Number=A,Type=Float,Description=\"Allele frequency in the cohort\">
##INFO=<ID=ECNT,Number=1,Type=Integer,Description=\"Number of events in this haplotype\">
##INFO=<ID=GC,Number=.,Type=Integer,Description=\"GC percent in 5-base windows\">
##INFO=<ID=LCR,Number=0,Type=Flag,Description=\"Low complexity region\">
##INFO=<ID=pass_cohort_AF,Number=1,Type=Float,Description=\"Frequency of PASS alleles in the cohort\">
##INFO=<ID=POPAF,Number=A,Type=Float,Description=\"negative log 10 population allele frequencies of alt alleles\">
##INFO=<ID=RMCL,Number=.,Type=String,Description=\"Repeat masker classes\">
##INFO=<ID=RPA,Number=R,Type=Integer,Description=\"Number of times tandem repeat unit is repeated\">
##INFO=<ID=SEGDUP,Number=0,Type=Flag,Description=\"Segmental duplication\">
##INFO=<ID=SIMPLEREP,Number=0,Type=Flag,Description=\"Simple repeat\">
##INFO=<ID=STR,Number=0,Type=Flag,Description=\"Variant is a short tandem repeat\">
##INFO=<ID=STRQ,Number=1,Type=Integer,Description=\"Phred-scaled quality that alt alleles in STRs are not polymerase slippage errors\">
##INFO=<ID=WESREG,Number=0,Type=Flag,Description=\"Exome target region\">
##FORMAT=<ID=GT,Number=1,Type=String,Description=\"Genotype\">
##FORMAT=<ID=AD,Number=R,Type=Integer,Description=\"Allelic depths for the ref and alt alleles\">
##FORMAT=<ID=AF,Number=A,Type=Float,Description=\"Allele fractions of alternate alleles\">
##FORMAT=<ID=DP,Number=1,Type=Integer,Description=\"Approximate read depth\">
##FORMAT=<ID=FAD,Number=R,Type=Integer,Description=\"Count of fragments supporting each allele\">
##FORMAT=<ID=GQ,Number=1,Type=Integer,Description=\"Genotype Quality\">
##FORMAT=<ID=SB,Number=4,Type=Integer,Description=\"Per-sample component statistics\">
##contig=<ID=chr1,length=248956422>
##contig=<ID=chr3,length=198295559>
##contig=<ID=chr14,length=107043718>
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tTUMOR
";

/// INFO column with every site annotation present.
pub const FULL_INFO: &str = "GERMQ=93;MBQ=30,32;MFRL=300,310;MMQ=60,60;MPOS=25;PL=0;TLOD=12.5;\
all_cohort_af=0.01;ECNT=1;GC=40,45,50;LCR;pass_cohort_AF=0.02;POPAF=5.6;RMCL=LINE,SINE;\
RPA=3,4;STR;STRQ=93;WESREG";

pub const FULL_FORMAT: &str = "GT:AD:AF:DP:FAD:GQ:SB";

/// One data line of a synthetic VCF.
#[derive(Debug, Clone)]
pub struct DemoRecord {
    pub chrom:   String,
    pub pos:     u64,
    pub alleles: (String, String),
    pub filter:  String,
    pub info:    String,
    pub format:  String,
    pub sample:  String,
}

impl DemoRecord {
    pub fn new(
        chrom: &str,
        pos: u64,
        reference: &str,
        alt: &str,
    ) -> Self {
        Self {
            chrom:   chrom.to_string(),
            pos,
            alleles: (reference.to_string(), alt.to_string()),
            filter:  "PASS".to_string(),
            info:    FULL_INFO.to_string(),
            format:  FULL_FORMAT.to_string(),
            sample:  "0/1:8,2:0.1:10:8,2:99:4,4,1,1".to_string(),
        }
    }

    pub fn with_filter(
        mut self,
        filter: &str,
    ) -> Self {
        self.filter = filter.to_string();
        self
    }

    pub fn with_info(
        mut self,
        info: &str,
    ) -> Self {
        self.info = info.to_string();
        self
    }

    pub fn with_sample(
        mut self,
        format: &str,
        sample: &str,
    ) -> Self {
        self.format = format.to_string();
        self.sample = sample.to_string();
        self
    }

    fn line(&self) -> String {
        format!(
            "{}\t{}\t.\t{}\t{}\t.\t{}\t{}\t{}\t{}",
            self.chrom,
            self.pos,
            self.alleles.0,
            self.alleles.1,
            self.filter,
            self.info,
            self.format,
            self.sample
        )
    }
}

/// Builds a single sample Mutect2-like VCF.
#[derive(Debug, Clone, Default)]
pub struct DemoVcfBuilder {
    records: Vec<DemoRecord>,
}

impl DemoVcfBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Three records: a PASS SNV with every tag, a filtered record missing
    /// the optional tags and a PASS SNV inside the IGH blacklist region.
    pub fn standard() -> Self {
        Self::new()
            .with_record(DemoRecord::new("chr1", 1000, "A", "T"))
            .with_record(
                DemoRecord::new("chr1", 2000, "C", "G")
                    .with_filter("weak_evidence")
                    .with_info("ECNT=2;TLOD=3.1")
                    .with_sample("GT:AF:DP", "0|1:0.1:20"),
            )
            .with_record(
                DemoRecord::new("chr14", 105600000, "G", "A")
                    .with_sample(FULL_FORMAT, "0/1:20,10:0.3:30:20,10:50:10,10,5,5"),
            )
    }

    pub fn with_record(
        mut self,
        record: DemoRecord,
    ) -> Self {
        self.records.push(record);
        self
    }

    pub fn render(&self) -> String {
        let mut text = HEADER.to_string();
        for record in &self.records {
            text.push_str(&record.line());
            text.push('\n');
        }
        text
    }

    pub fn write(
        &self,
        path: &Path,
    ) -> anyhow::Result<()> {
        let mut file = File::create(path)?;
        file.write_all(self.render().as_bytes())?;
        Ok(())
    }

    pub fn write_gz(
        &self,
        path: &Path,
    ) -> anyhow::Result<()> {
        let mut encoder = GzEncoder::new(File::create(path)?, Compression::default());
        encoder.write_all(self.render().as_bytes())?;
        encoder.finish()?;
        Ok(())
    }
}
