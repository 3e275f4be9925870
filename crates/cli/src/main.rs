use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use scenecover::api::{
    draw_aoi, draw_catalog, BBox, BnbOptimizer, CatalogCfg, ContinuousTransformer,
    DiscreteTransformer, GreedyOptimizer, OnlineTransformer, Optimizer, Point, ShapeCfg,
    SolveCfg, SolveReport, Solver, Transformer,
};
use serde::Serialize;
use serde_json::json;
use tracing_subscriber::fmt::SubscriberBuilder;

mod io;
mod provenance;

#[derive(Parser)]
#[command(name = "scenecover")]
#[command(about = "Cheapest scene selection covering an area of interest")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Solve every AOI of a CSV against a scene catalog; write a JSON report
    Solve(SolveArgs),
    /// Draw a seeded random catalog (and optionally AOIs) as CSV
    Generate(GenerateArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
enum TransformerKind {
    Discrete,
    Continuous,
    Online,
}

#[derive(Clone, Copy, Debug, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
enum OptimizerKind {
    Greedy,
    Bnb,
    BnbOffcut,
}

#[derive(Args, Debug)]
struct SolveArgs {
    /// AOI CSV (`polygon`, optional `delta`)
    #[arg(long)]
    aoi: PathBuf,
    /// Catalog CSV (`polygon`, `price`, optional `label`)
    #[arg(long)]
    catalog: PathBuf,
    #[arg(long, value_enum, default_value_t = TransformerKind::Continuous)]
    transformer: TransformerKind,
    /// Grid spacing for the discrete transformer
    #[arg(long, default_value_t = 0.05)]
    delta: f64,
    #[arg(long, value_enum, default_value_t = OptimizerKind::Bnb)]
    optimizer: OptimizerKind,
    /// Required covered fraction in [0, 1]
    #[arg(long, default_value_t = 1.0)]
    target: f64,
    #[arg(long)]
    time_limit_ms: Option<u64>,
    /// JSON report path
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    #[arg(long, default_value_t = 0)]
    seed: u64,
    #[arg(long, default_value_t = 50)]
    scenes: usize,
    /// Catalog CSV path
    #[arg(long)]
    out: PathBuf,
    /// Also write this many AOIs here
    #[arg(long)]
    aoi_out: Option<PathBuf>,
    #[arg(long, default_value_t = 1)]
    aois: usize,
    #[arg(long)]
    scene_area: Option<f64>,
    #[arg(long)]
    aoi_area: Option<f64>,
    /// Side of the square region `[0, side]²` the shapes are placed in
    #[arg(long)]
    region: Option<f64>,
}

#[derive(Serialize)]
struct AoiReport {
    aoi: usize,
    #[serde(flatten)]
    report: SolveReport,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Solve(args) => solve(&args),
        Action::Generate(args) => generate(&args),
    }
}

fn transformer(kind: TransformerKind, delta: f64) -> Result<Box<dyn Transformer>> {
    Ok(match kind {
        TransformerKind::Discrete => Box::new(DiscreteTransformer::new(delta)?),
        TransformerKind::Continuous => Box::new(ContinuousTransformer::new()),
        TransformerKind::Online => Box::new(OnlineTransformer::new()),
    })
}

fn optimizer(kind: OptimizerKind) -> Box<dyn Optimizer> {
    match kind {
        OptimizerKind::Greedy => Box::new(GreedyOptimizer::new()),
        OptimizerKind::Bnb => Box::new(BnbOptimizer::discrete()),
        OptimizerKind::BnbOffcut => Box::new(BnbOptimizer::offcut()),
    }
}

fn solve(args: &SolveArgs) -> Result<()> {
    if !(0.0..=1.0).contains(&args.target) {
        anyhow::bail!("--target must lie in [0, 1], got {}", args.target);
    }
    let aois = io::read_aois(&args.aoi)?;
    let catalog = io::read_catalog(&args.catalog)?;
    let solver = Solver::new(
        Some(transformer(args.transformer, args.delta)?),
        Some(optimizer(args.optimizer)),
    );
    let cfg = SolveCfg::new(args.target, args.time_limit_ms.map(Duration::from_millis));
    tracing::info!(
        solver = %solver.tag(),
        aois = aois.len(),
        candidates = catalog.len(),
        target = args.target,
        "solve"
    );

    let mut reports = Vec::with_capacity(aois.len());
    for (idx, aoi) in aois.iter().enumerate() {
        let report = solver
            .solve(aoi, &catalog, &cfg)
            .with_context(|| format!("solving AOI {idx}"))?;
        tracing::info!(
            aoi = idx,
            status = ?report.status,
            cost = report.total_cost,
            coverage = report.coverage_ratio,
            "aoi solved"
        );
        reports.push(AoiReport { aoi: idx, report });
    }

    write_json(&args.out, &reports)?;
    let payload = provenance::Payload::new(
        "solve",
        json!({
            "transformer": args.transformer,
            "delta": args.delta,
            "optimizer": args.optimizer,
            "target": args.target,
            "time_limit_ms": args.time_limit_ms,
        }),
    )
    .with_input(&args.aoi)
    .with_input(&args.catalog);
    let sidecar = provenance::write_sidecar(&args.out, payload)?;
    tracing::info!(out = %args.out.display(), sidecar = %sidecar.display(), "report written");
    Ok(())
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    std::fs::write(path, serde_json::to_vec_pretty(value)?)
        .with_context(|| format!("writing {}", path.display()))
}

fn generate(args: &GenerateArgs) -> Result<()> {
    let mut cfg = CatalogCfg {
        scenes: args.scenes,
        ..CatalogCfg::default()
    };
    if let Some(a) = args.scene_area {
        cfg.shape.area = a;
    }
    if let Some(side) = args.region {
        cfg.shape.region = BBox {
            min: Point::new(0.0, 0.0),
            max: Point::new(side, side),
        };
    }
    let catalog = draw_catalog(&cfg, args.seed);
    io::write_catalog(&args.out, &catalog)?;
    let params = json!({
        "seed": args.seed,
        "scenes": args.scenes,
        "scene_area": cfg.shape.area,
        "region": [cfg.shape.region.max.x, cfg.shape.region.max.y],
    });
    provenance::write_sidecar(&args.out, provenance::Payload::new("generate", params.clone()))?;
    tracing::info!(out = %args.out.display(), scenes = catalog.len(), "catalog written");

    if let Some(path) = &args.aoi_out {
        let shape = ShapeCfg {
            area: args.aoi_area.unwrap_or(cfg.shape.area * 4.0),
            ..cfg.shape
        };
        // Seeds past the catalog seed keep AOIs distinct from each other.
        let aois: Vec<_> = (0..args.aois as u64)
            .map(|k| draw_aoi(&shape, args.seed.wrapping_add(k)))
            .collect();
        io::write_aois(path, &aois)?;
        provenance::write_sidecar(path, provenance::Payload::new("generate", params))?;
        tracing::info!(out = %path.display(), aois = aois.len(), "aois written");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn solve_args(dir: &Path, transformer: TransformerKind, optimizer: OptimizerKind) -> SolveArgs {
        SolveArgs {
            aoi: dir.join("aoi.csv"),
            catalog: dir.join("catalog.csv"),
            transformer,
            delta: 0.25,
            optimizer,
            target: 1.0,
            time_limit_ms: None,
            out: dir.join("out").join("report.json"),
        }
    }

    #[test]
    fn solve_writes_report_and_sidecar() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("aoi.csv"),
            "polygon\n\"[[0,0],[1,0],[1,1],[0,1]]\"\n\"[[5,5],[6,5],[6,6],[5,6]]\"\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("catalog.csv"),
            "polygon,price,label\n\
             \"[[0,0],[1,0],[1,1],[0,1]]\",10,full\n\
             \"[[0,0],[0.5,0],[0.5,1],[0,1]]\",3,left\n\
             \"[[0.5,0],[1,0],[1,1],[0.5,1]]\",3,right\n",
        )
        .unwrap();
        for t in [
            TransformerKind::Discrete,
            TransformerKind::Continuous,
            TransformerKind::Online,
        ] {
            let args = solve_args(dir.path(), t, OptimizerKind::Bnb);
            solve(&args).unwrap();
            let doc: serde_json::Value =
                serde_json::from_slice(&std::fs::read(&args.out).unwrap()).unwrap();
            let rows = doc.as_array().unwrap();
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0]["aoi"], 0);
            assert_eq!(rows[0]["status"], "optimal");
            assert_eq!(rows[0]["total_cost"], 6.0);
            let mut labels: Vec<&str> = rows[0]["selected_labels"]
                .as_array()
                .unwrap()
                .iter()
                .map(|l| l.as_str().unwrap())
                .collect();
            labels.sort();
            assert_eq!(labels, ["left", "right"]);
            // Nothing in the catalog reaches the second AOI.
            assert_eq!(rows[1]["status"], "infeasible");
            assert!(dir.path().join("out/report.provenance.json").exists());
        }
    }

    #[test]
    fn report_dir_errors_name_the_dir() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let err = write_json(&blocker.join("report.json"), &json!([])).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("creating output dir"), "{msg}");
        assert!(msg.contains("blocker"), "{msg}");
    }

    #[test]
    fn solve_rejects_bad_target() {
        let dir = tempdir().unwrap();
        let mut args = solve_args(dir.path(), TransformerKind::Continuous, OptimizerKind::Greedy);
        args.target = 1.5;
        assert!(solve(&args).is_err());
    }

    #[test]
    fn generate_then_solve() {
        let dir = tempdir().unwrap();
        let gen = GenerateArgs {
            seed: 3,
            scenes: 12,
            out: dir.path().join("catalog.csv"),
            aoi_out: Some(dir.path().join("aoi.csv")),
            aois: 2,
            scene_area: Some(1.0),
            aoi_area: Some(2.0),
            region: Some(3.0),
        };
        generate(&gen).unwrap();
        assert_eq!(io::read_catalog(&gen.out).unwrap().len(), 12);
        assert_eq!(io::read_aois(&dir.path().join("aoi.csv")).unwrap().len(), 2);
        assert!(dir.path().join("catalog.provenance.json").exists());

        let mut args = solve_args(dir.path(), TransformerKind::Continuous, OptimizerKind::Greedy);
        args.target = 0.5;
        solve(&args).unwrap();
        let doc: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&args.out).unwrap()).unwrap();
        assert_eq!(doc.as_array().unwrap().len(), 2);
        assert_eq!(doc[0]["transformer"], "continuous");
        assert_eq!(doc[0]["optimizer"], "greedy");
    }
}
