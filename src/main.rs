//! triplog cli - driving analytics from a GPS trip log

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use argopt::{cmd_group, subcmd};
use csv::{Reader, Writer};
use serde::Deserialize;

use triplog::{
    write_csv, CsvSource, DynamicTrip, DynamicsLimits, Feature, FieldsConfiguration, GpxGenerator,
    IngestOptions, SmoothnessConfig, Tier, Tracker, Trip, TripMetrics, TripReport,
};

/// CLI of triplog - Score the smoothness and style of your driving from raw GPS logs
#[cmd_group(commands = [analyze, export])]
fn main() -> Result<(), String> {}

/// Analyze a trip CSV file and print its report
#[subcmd]
fn analyze(
    /// Trip CSV file: timestamp,lat,lon,speed_mps[,accuracy_m]
    csv_path: String,
    /// Fields and thresholds configuration. Default: .triplog.yaml, ~/.triplog.yaml
    #[opt(long)]
    config: Option<String>,
    /// Unlock the premium insights
    #[opt(long)]
    premium: bool,
    /// Print the report as JSON
    #[opt(long)]
    json: bool,
) -> Result<(), String> {
    colog::init();

    let configs = load_configs(config);
    let tier = Tier::new(premium);
    let trip = load_trip(&csv_path, &configs)?;

    let report = TripReport::build(&trip, &configs.smoothness, tier).map_err(|e| e.to_string())?;

    if json {
        let out = serde_json::to_string_pretty(&report)
            .map_err(|e| format!("Failed on serialize the report: {}", e))?;
        println!("{}", out);
    } else {
        print_report(&report, tier);
    }

    Ok(())
}

/// Export the processed trip as CSV or GPX
#[subcmd]
fn export(
    /// Trip CSV file: timestamp,lat,lon,speed_mps[,accuracy_m]
    csv_path: String,
    /// Destination file
    destination: String,
    /// Write a GPX track instead of the augmented CSV
    #[opt(long)]
    gpx: bool,
    /// Also write the trip metrics as JSON to this path
    #[opt(long)]
    metrics: Option<String>,
    /// Fields and thresholds configuration. Default: .triplog.yaml, ~/.triplog.yaml
    #[opt(long)]
    config: Option<String>,
    /// Unlock the premium features
    #[opt(long)]
    premium: bool,
) -> Result<(), String> {
    colog::init();

    let tier = Tier::new(premium);
    if !tier.has_feature(Feature::ExportData) {
        return Err(format!(
            "`{}` is a premium feature: {}",
            Feature::ExportData,
            Feature::ExportData.description()
        ));
    }

    let configs = load_configs(config);
    let trip = load_trip(&csv_path, &configs)?;

    let destination_file = File::create(&destination)
        .map_err(|e| format!("Failed on create the destination file: {}", e))?;
    let writer = BufWriter::new(destination_file);

    if gpx {
        let name = Path::new(&csv_path)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("trip")
            .to_string();

        let track = Tracker::new(name)
            .source("triplog".to_string())
            .max_gap(configs.segments.max_gap)
            .build(&trip);

        let mut generator = GpxGenerator::empty();
        generator.tracks = vec![track];
        generator.write(writer).map_err(|e| e.to_string())?;
    } else {
        let mut wtr = Writer::from_writer(writer);
        write_csv(&trip, &mut wtr).map_err(|e| e.to_string())?;
    }
    log::info!("Exported {} samples to {}", trip.len(), destination);

    if let Some(metrics_path) = metrics {
        let trip_metrics =
            TripMetrics::calculate(&trip, &configs.smoothness).map_err(|e| e.to_string())?;

        let metrics_file = File::create(&metrics_path)
            .map_err(|e| format!("Failed on create the metrics file: {}", e))?;
        serde_json::to_writer_pretty(BufWriter::new(metrics_file), &trip_metrics)
            .map_err(|e| format!("Failed on write the metrics: {}", e))?;
        log::info!("Metrics written to {}", metrics_path);
    }

    Ok(())
}

/// Read, normalize and derive the trip dynamics
fn load_trip(csv_path: &str, configs: &Configs) -> Result<DynamicTrip, String> {
    let csv =
        File::open(csv_path).map_err(|e| format!("Failed on open the CSV file: {}", e))?;
    let rcsv = Reader::from_reader(csv);

    let source = CsvSource::new(rcsv, Some(configs.fields.clone()));
    let trip = Trip::from_source(source, &configs.ingest).map_err(|e| e.to_string())?;
    log::info!("Loaded {} GPS samples from {}", trip.len(), csv_path);

    Ok(trip.dynamics(&configs.dynamics))
}

fn print_report(report: &TripReport, tier: Tier) {
    let m = &report.metrics;

    println!("Trip summary ({} GPS samples)", report.samples);
    println!("  Duration:   {:.1} min", m.duration_min);
    println!("  Distance:   {:.2} km", m.distance_km);
    println!("  Avg speed:  {:.1} km/h", m.avg_speed_kmh);
    println!("  Max speed:  {:.1} km/h", m.max_speed_kmh);
    println!(
        "  Smoothness: {:.1}/100 ({:?})",
        m.smoothness_score, report.rating
    );

    if tier.has_feature(Feature::AdvancedAnalytics) {
        println!("Advanced analytics");
        println!("  Max acceleration: {:.2} m/s²", m.max_acceleration);
        println!("  Max deceleration: {:.2} m/s²", m.max_deceleration);
        println!("  Avg jerk:         {:.2} m/s³", m.avg_jerk);
    }

    if let Some(insights) = &report.insights {
        println!(
            "Driving style: {} (confidence {:.0}%)",
            insights.style.style,
            insights.style.confidence * 100.
        );
        println!("Recommendations");
        for rec in &insights.recommendations {
            println!("  - {}", rec);
        }
        if !insights.anomalies.is_empty() {
            println!("Anomalies");
            for anomaly in &insights.anomalies {
                println!("  - {}", anomaly);
            }
        }
    }

    if tier == Tier::Free {
        println!("Upgrade to premium (--premium) for:");
        for feature in Feature::ALL.iter().filter(|f| !tier.has_feature(**f)) {
            println!("  - {}", feature.description());
        }
    }
}

/// Load the current config
fn load_configs(provided: Option<String>) -> Configs {
    let mut options = vec![];

    if let Some(sprovided) = provided {
        options.push(sprovided);
    }

    options.push(".triplog.yaml".to_string());

    if let Some(home) = dirs::home_dir() {
        if let Some(shome) = home.to_str() {
            options.push(format!("{}/.triplog.yaml", shome));
        }
    }

    for fi in options {
        if let Ok(s) = fs::read_to_string(&fi) {
            match serde_yaml::from_str::<Configs>(&s) {
                Ok(conf) => return conf,
                Err(e) => {
                    log::warn!("Ignoring invalid config {}: {}", fi, e);
                    break;
                }
            }
        }
    }

    Configs::default()
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
struct Configs {
    pub fields: FieldsConfiguration,
    pub ingest: IngestOptions,
    pub dynamics: DynamicsLimits,
    pub smoothness: SmoothnessConfig,
    pub segments: SegmentOptions,
}

/// GPX track segmentation
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
struct SegmentOptions {
    /// Max seconds between two samples of one segment
    pub max_gap: u32,
}

impl Default for SegmentOptions {
    fn default() -> Self {
        Self { max_gap: 300 }
    }
}

#[test]
fn parse_configs() -> Result<(), String> {
    let yaml = "\nfields:\n  speed: velocity\nsegments:\n  max_gap: 600";

    let conf: Configs = serde_yaml::from_str(yaml).map_err(|e| e.to_string())?;

    assert_eq!(
        Configs {
            fields: FieldsConfiguration {
                speed: "velocity".to_string(),
                ..Default::default()
            },
            segments: SegmentOptions { max_gap: 600 },
            ..Default::default()
        },
        conf
    );

    let yaml = "\ningest:\n  max_accuracy_m: 25\nsmoothness:\n  good_acc_std: 0.8\ndynamics:\n  max_jerk_mps3: 15";

    let conf: Configs = serde_yaml::from_str(yaml).map_err(|e| e.to_string())?;

    assert_eq!(25., conf.ingest.max_accuracy_m);
    assert_eq!(0.8, conf.smoothness.good_acc_std);
    assert_eq!(2., conf.smoothness.good_jerk_std);
    assert_eq!(15., conf.dynamics.max_jerk_mps3);
    assert_eq!(-20., conf.dynamics.min_jerk_mps3);
    assert_eq!(FieldsConfiguration::default(), conf.fields);

    Ok(())
}
