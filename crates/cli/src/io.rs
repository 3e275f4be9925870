//! CSV ingestion and export for AOIs and scene catalogs.
//!
//! Layout
//! - AOI files: `polygon` (text `[[x,y],...]`), optional `delta`.
//! - Catalog files: `polygon`, `price`, optional `label`.

use std::fs::File;
use std::path::Path;

use anyhow::{bail, Context, Result};
use polars::prelude::*;
use scenecover::api::{AreaOfInterest, CandidateItem, Polygon};

fn read_frame(path: &Path) -> Result<DataFrame> {
    let df = LazyCsvReader::new(path)
        .with_has_header(true)
        .with_infer_schema_length(Some(100))
        .finish()
        .with_context(|| format!("opening {}", path.display()))?
        .collect()
        .with_context(|| format!("reading {}", path.display()))?;
    tracing::debug!(rows = df.height(), cols = df.width(), path = %path.display(), "csv loaded");
    Ok(df)
}

fn polygons(df: &DataFrame, path: &Path) -> Result<Vec<Polygon>> {
    let col = df
        .column("polygon")
        .with_context(|| format!("{}: missing `polygon` column", path.display()))?
        .str()?;
    col.into_iter()
        .enumerate()
        .map(|(row, text)| {
            let Some(text) = text else {
                bail!("{}: row {row}: empty polygon", path.display());
            };
            text.parse::<Polygon>()
                .with_context(|| format!("{}: row {row}", path.display()))
        })
        .collect()
}

/// Optional numeric column as `Vec<Option<f64>>` (all `None` when absent).
fn optional_f64(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    match df.column(name) {
        Ok(s) => {
            let s = s.cast(&DataType::Float64)?;
            Ok(s.f64()?.into_iter().collect())
        }
        Err(_) => Ok(vec![None; df.height()]),
    }
}

pub fn read_aois(path: &Path) -> Result<Vec<AreaOfInterest>> {
    let df = read_frame(path)?;
    let polys = polygons(&df, path)?;
    let deltas = optional_f64(&df, "delta")?;
    polys
        .into_iter()
        .zip(deltas)
        .enumerate()
        .map(|(row, (p, d))| {
            let aoi = AreaOfInterest::new(p);
            match d {
                Some(d) => aoi
                    .with_delta(d)
                    .with_context(|| format!("{}: row {row}", path.display())),
                None => Ok(aoi),
            }
        })
        .collect()
}

pub fn read_catalog(path: &Path) -> Result<Vec<CandidateItem>> {
    let df = read_frame(path)?;
    let polys = polygons(&df, path)?;
    let prices = optional_f64(&df, "price")?;
    let labels: Vec<Option<String>> = match df.column("label") {
        Ok(s) => s
            .cast(&DataType::String)?
            .str()?
            .into_iter()
            .map(|l| l.filter(|l| !l.is_empty()).map(str::to_string))
            .collect(),
        Err(_) => vec![None; df.height()],
    };
    polys
        .into_iter()
        .zip(prices)
        .zip(labels)
        .enumerate()
        .map(|(row, ((p, price), label))| {
            let Some(price) = price else {
                bail!("{}: row {row}: missing price", path.display());
            };
            let item = CandidateItem::new(p, price)
                .with_context(|| format!("{}: row {row}", path.display()))?;
            Ok(match label {
                Some(l) => item.with_label(l),
                None => item,
            })
        })
        .collect()
}

fn write_frame(path: &Path, df: &mut DataFrame) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    let mut file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(df)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

pub fn write_catalog(path: &Path, items: &[CandidateItem]) -> Result<()> {
    let polygon: Vec<String> = items.iter().map(|c| c.polygon.to_string()).collect();
    let price: Vec<f64> = items.iter().map(|c| c.price).collect();
    let label: Vec<String> = items
        .iter()
        .map(|c| c.label.clone().unwrap_or_default())
        .collect();
    let mut df = df!("polygon" => polygon, "price" => price, "label" => label)?;
    write_frame(path, &mut df)
}

pub fn write_aois(path: &Path, aois: &[AreaOfInterest]) -> Result<()> {
    let polygon: Vec<String> = aois.iter().map(|a| a.polygon.to_string()).collect();
    let delta: Vec<Option<f64>> = aois.iter().map(|a| a.delta).collect();
    let mut df = df!("polygon" => polygon, "delta" => delta)?;
    write_frame(path, &mut df)
}
