use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use orphalink::*;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "orphalink")]
#[command(author = "orphalink Contributors")]
#[command(version = "0.3.0")]
#[command(
    about = "Annotate simulated patients with variant rank and Orphanet/OMIM disease ids",
    long_about = None
)]
struct Args {
    /// Directory holding patient .vcf files and ranking .ezr files
    #[arg(value_name = "DIR")]
    path: PathBuf,

    /// Orphanet catalog with OMIM cross-references (phenotype pass)
    #[arg(long)]
    lookup: PathBuf,

    /// Orphanet catalog with inheritance patterns
    #[arg(long)]
    inheritance_catalog: PathBuf,

    /// Orphanet catalog with genotype OMIM references
    #[arg(long)]
    geno_pheno: PathBuf,

    /// Mutation database VCF
    #[arg(long)]
    mutations: PathBuf,

    /// INFO key holding the genotype OMIM id in the mutation database
    #[arg(long, default_value = "OMIMID")]
    disease_id_key: String,

    /// Phenotype annotation table
    #[arg(long)]
    phenotype_annotations: PathBuf,

    /// Patients carry autosomal recessive diseases (default is dominant)
    #[arg(short = 'R', long)]
    recessive: bool,

    /// Restrict curated diseases to these inheritance patterns (AD, AR, XLD, XLR, MT or a full label)
    #[arg(long = "inheritance")]
    inheritance: Vec<InheritancePattern>,

    /// Write the curated index as TSV
    #[arg(long)]
    index_out: Option<PathBuf>,

    /// Write the full cross-reference index as JSON
    #[arg(long)]
    dump_index: Option<PathBuf>,

    /// Statistics report output path
    #[arg(long)]
    stats: Option<PathBuf>,

    /// Verbose output mode
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode (no progress display)
    #[arg(short, long)]
    quiet: bool,

    /// Number of threads (defaults to number of CPU cores)
    #[arg(short = 'j', long)]
    threads: Option<usize>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // RUST_LOG still takes precedence over -v
    env_logger::Builder::from_default_env()
        .filter_level(log_level(args.verbose))
        .parse_default_env()
        .init();

    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to set thread pool size")?;
    }

    let resolution = if args.inheritance.is_empty() {
        ResolutionConfig::default()
    } else {
        ResolutionConfig::with_inheritance(args.inheritance.iter().copied())
    };
    resolution.validate()?;

    let target_mode = if args.recessive {
        TargetMode::Recessive
    } else {
        TargetMode::Dominant
    };
    let annotation = AnnotationConfig::new(target_mode);
    annotation.validate()?;

    if !args.path.is_dir() {
        anyhow::bail!("Patient directory does not exist: {}", args.path.display());
    }

    if args.verbose {
        display_config(&args, &resolution, &annotation);
    }

    // Build phase
    let build = build_cross_reference(&args)?;
    let summary = build.index.summary(build.stats.unmatched);
    log::info!(
        "Inheritance patterns recorded for {} phenotype ids",
        build.inheritance_by_phenotype.len()
    );

    if let Some(path) = &args.dump_index {
        write_index_json(&build.index, path)?;
        println!("Cross-reference index written to: {}", path.display());
    }

    let mutation_entries = parse_mutation_database(&args.mutations, &args.disease_id_key)?;
    let mutations = ReverseMutationIndex::from_entries(&mutation_entries);

    let annotations = parse_phenotype_annotations(&args.phenotype_annotations)?;
    let annotated = omim_phenotype_ids(&annotations);

    let (curated, report) = resolve_index(&build.index, &annotated, &mutations, &resolution);

    if let Some(path) = &args.index_out {
        let written = write_curated_index(&curated, path)?;
        println!("Wrote {} curated records to {}", written, path.display());
    }

    // Annotation phase
    let patient_stats = annotate_directory(&args.path, &curated, &annotation, args.quiet)?;

    if args.verbose || args.stats.is_some() {
        print_statistics(
            &build.stats,
            &summary,
            &report,
            &patient_stats,
            args.stats.as_deref(),
        )?;
    }

    println!(
        "\n✓ Annotated {} patients ({} curated diseases)",
        patient_stats.processed,
        curated.len()
    );

    Ok(())
}

fn log_level(verbose: bool) -> log::LevelFilter {
    if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    }
}

fn display_config(args: &Args, resolution: &ResolutionConfig, annotation: &AnnotationConfig) {
    let accepted = match &resolution.accepted_inheritance {
        Some(patterns) => {
            let mut labels: Vec<_> = patterns.iter().map(|p| p.label()).collect();
            labels.sort_unstable();
            labels.join(", ")
        }
        None => "any".to_string(),
    };

    println!("============================================================");
    println!("orphalink Configuration");
    println!("============================================================");
    println!();
    println!("Orphanet catalogs:");
    println!("  Phenotype cross-references:   {}", args.lookup.display());
    println!("  Inheritance patterns:         {}", args.inheritance_catalog.display());
    println!("  Genotype cross-references:    {}", args.geno_pheno.display());
    println!();
    println!("Resolution:");
    println!("  Mutation database:            {}", args.mutations.display());
    println!("  Phenotype annotations:        {}", args.phenotype_annotations.display());
    println!("  Accepted inheritance:         {}", accepted);
    println!();
    println!("Patients:");
    println!("  Directory:                    {}", args.path.display());
    println!("  Target selection:             {:?}", annotation.target_mode);
    println!("  Threads:                      {}", rayon::current_num_threads());
    println!();
    println!("============================================================");
}

fn build_cross_reference(args: &Args) -> Result<CrossReferenceBuild> {
    let lookup = parse_catalog(&args.lookup)?;
    let inheritance = parse_catalog(&args.inheritance_catalog)?;
    let geno_pheno = parse_catalog(&args.geno_pheno)?;

    build_index(&lookup, &inheritance, &geno_pheno).context("Failed to build cross-reference index")
}

fn annotate_directory(
    dir: &Path,
    curated: &CrossReferenceIndex,
    config: &AnnotationConfig,
    quiet: bool,
) -> Result<PatientStats> {
    let patients = discover_patient_files(dir, config)?;
    log::info!("Found {} patient/ranking pairs in {}", patients.len(), dir.display());

    let progress = if !quiet {
        let pb = ProgressBar::new(patients.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
                .context("Invalid progress bar template")?
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let results: Vec<PatientStats> = patients
        .par_iter()
        .map(|files| {
            let stats = match process_patient(files, curated, config) {
                Ok(stats) => stats,
                Err(err) => {
                    log::error!("Failed to annotate {}: {:#}", files.variants.display(), err);
                    PatientStats {
                        failed: 1,
                        ..Default::default()
                    }
                }
            };

            if let Some(pb) = &progress {
                pb.inc(1);
            }
            stats
        })
        .collect();

    if let Some(pb) = progress {
        pb.finish_with_message("Annotation complete");
    }

    let mut total = PatientStats::default();
    for stats in &results {
        total.merge(stats);
    }
    Ok(total)
}

fn print_statistics(
    build: &BuildStats,
    summary: &IndexSummary,
    resolution: &ResolutionReport,
    patients: &PatientStats,
    output_path: Option<&Path>,
) -> Result<()> {
    let report = format!(
        r#"
═══════════════════════════════════════════════════════════
                  Cross-Reference Statistics
═══════════════════════════════════════════════════════════

Catalog passes:
  - Disorders (phenotype pass):   {}
  - Disorders (inheritance pass): {}
  - Disorders (genotype pass):    {}
  - Malformed ids:                {}

PHENO OMIM:
  - {} entries missing OMIM Pheno entry
  - {} entries with one OMIM Pheno entry
  - {} entries with many OMIM pheno entries
INHERITANCE:
  - {} entries missing inheritance pattern
GENO OMIM:
  - {} entries missing OMIM Geno entry
  - {} entries with one OMIM Geno entry
  - {} entries with many OMIM Geno entries
  - {} ideal entries (1 of each)

Resolution:
  - Indexed diseases:     {}
  - Ideal:                {}
  - Inheritance accepted: {}
  - Phenotype annotated:  {}
  - Known variant:        {}

Patients:
  - Processed:            {}
  - Rank found:           {}
  - Rank not found:       {}
  - Ids recovered:        {}
  - Ids not recovered:    {}
  - Failed:               {}

═══════════════════════════════════════════════════════════
"#,
        build.phenotype_disorders,
        build.inheritance_disorders,
        build.genotype_disorders,
        build.malformed_ids,
        summary.missing_phenotype,
        summary.one_phenotype,
        summary.many_phenotypes,
        summary.missing_inheritance,
        summary.missing_genotype,
        summary.one_genotype,
        summary.many_genotypes,
        summary.ideal,
        resolution.input,
        resolution.ideal,
        resolution.inheritance,
        resolution.phenotype,
        resolution.genotype,
        patients.processed,
        patients.ranked,
        patients.not_found,
        patients.recovered,
        patients.recovery_failed,
        patients.failed,
    );

    println!("{}", report);

    if let Some(path) = output_path {
        fs::write(path, report).context("Failed to write statistics report")?;
        println!("Statistics report written to: {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_enables_debug_logging() {
        let args = Args::parse_from([
            "orphalink", "patients", "--lookup", "a.xml", "--inheritance-catalog", "b.xml",
            "--geno-pheno", "c.xml", "--mutations", "hgmd.vcf", "--phenotype-annotations",
            "p.tab", "-v",
        ]);
        assert!(args.verbose);
        assert_eq!(log_level(args.verbose), log::LevelFilter::Debug);
        assert_eq!(log_level(false), log::LevelFilter::Info);
    }
}
