//! Subcommand implementations.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use countrymask::{
    boundary_source, build_country_mask, get_country, CountryMaskDataset, DataPaths,
    DomainRegistry, MaskOptions, RasterMode, TerritoryPolicy,
};
use tracing::info;

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Domain name (e.g. EUROPE)
    pub domain: String,

    /// Options file (YAML); flags below override it
    #[arg(short, long, env = "COUNTRYMASK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Extra domain definitions (YAML `domains:` list)
    #[arg(long, env = "COUNTRYMASK_DOMAINS")]
    pub domains: Option<PathBuf>,

    /// Root of the shared data tree
    #[arg(long)]
    pub data_path: Option<PathBuf>,

    /// Root of the per-domain footprint directories
    #[arg(long)]
    pub fp_directory: Option<PathBuf>,

    /// Output file; `.nc` is appended when missing
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Skip the land layer
    #[arg(long)]
    pub no_land: bool,

    /// Skip the EEZ layer
    #[arg(long)]
    pub no_ocean: bool,

    /// Skip gap filling
    #[arg(long)]
    pub no_fill_gaps: bool,

    /// Renumber present countries from 1
    #[arg(long)]
    pub reset_index: bool,

    /// Assign territories to their sovereign state
    #[arg(long)]
    pub sovereign: bool,

    /// Cell matching: cell_centre or all_touched
    #[arg(long)]
    pub raster_mode: Option<RasterMode>,

    /// Comma separated country codes to keep
    #[arg(long, value_delimiter = ',')]
    pub countries: Option<Vec<String>>,

    /// Author recorded in the output file
    #[arg(long)]
    pub author: Option<String>,
}

impl CreateArgs {
    /// Options from the config file (or defaults) with flags applied.
    pub fn mask_options(&self) -> Result<MaskOptions> {
        let mut options = match &self.config {
            Some(path) => MaskOptions::from_yaml_file(path)
                .with_context(|| format!("loading options from {}", path.display()))?,
            None => MaskOptions::default(),
        };

        if self.no_land {
            options.include_land_territories = false;
        }
        if self.no_ocean {
            options.include_ocean_territories = false;
        }
        if self.no_fill_gaps {
            options.fill_gaps = false;
        }
        if self.reset_index {
            options.reset_index = true;
        }
        if self.sovereign {
            options.territory_policy = TerritoryPolicy::Sovereign;
        }
        if let Some(mode) = self.raster_mode {
            options.raster_mode = mode;
        }
        if let Some(codes) = &self.countries {
            options.country_list = Some(codes.clone());
        }
        if let Some(author) = &self.author {
            options.author = Some(author.clone());
        }
        if let Some(output) = &self.output {
            options.output_path = Some(output.clone());
            options.save = true;
        }

        let paths = self.data_paths();
        if let Some(dir) = &self.fp_directory {
            options.fp_directory = Some(dir.clone());
        } else if options.fp_directory.is_none() {
            options.fp_directory = Some(paths.fp_directory);
        }

        Ok(options)
    }

    pub fn data_paths(&self) -> DataPaths {
        match &self.data_path {
            Some(root) => DataPaths::under(root.clone()),
            None => DataPaths::from_env(),
        }
    }
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Saved country mask file
    pub file: PathBuf,

    /// Domain the file must belong to
    #[arg(short, long)]
    pub domain: String,
}

pub fn create(args: CreateArgs) -> Result<()> {
    let options = args.mask_options()?;
    options.validate()?;

    let registry = match &args.domains {
        Some(path) => DomainRegistry::builtin()
            .load_yaml_file(path)
            .with_context(|| format!("loading domains from {}", path.display()))?,
        None => DomainRegistry::builtin(),
    };
    let volume = registry.resolve(&args.domain, options.fp_directory.as_deref())?;

    let source = boundary_source(&args.data_paths());
    let dataset = build_country_mask(&volume, &options, source.as_ref())?;

    info!(
        domain = %dataset.domain,
        countries = dataset.countries.len(),
        output = ?options.output_file(),
        "Country mask complete"
    );
    print_summary(&dataset);
    Ok(())
}

pub fn show(args: ShowArgs) -> Result<()> {
    let file = get_country(&args.domain, &args.file)
        .with_context(|| format!("reading {}", args.file.display()))?;
    let dataset = CountryMaskDataset::from_country_file(&file)?;
    print_summary(&dataset);
    Ok(())
}

fn print_summary(dataset: &CountryMaskDataset) {
    let (n_lat, n_lon) = dataset.shape();
    println!("domain: {} ({} x {})", dataset.domain, n_lat, n_lon);
    for (key, value) in &dataset.attributes {
        println!("  {}: {}", key, value);
    }
    println!("countries: {}", dataset.countries.len());
    for record in dataset.countries.iter() {
        println!(
            "  {:>4}  {}  {:<40} {:>8} cells",
            record.index,
            record.code,
            record.name,
            dataset.country.count(record.index)
        );
    }
}
