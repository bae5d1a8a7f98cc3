mod configuration;
mod export;
mod ingest;
#[cfg(test)]
mod test_fixtures;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use configuration::Configuration;
use gtfs_decode::DecodeReport;
use gtfs_schedule::FeedStore;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(about = "Service calendars, stop departures and shapes of static transit feeds")]
struct Args {
    /// Configuration file. Defaults to /data/cities.json, then ./cities.json
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the configured cities
    Cities,
    /// Stops of a city
    Stops {
        #[arg(long)]
        city: String,
    },
    /// Routes of a city
    Routes {
        #[arg(long)]
        city: String,
    },
    /// Trips of a city
    Trips {
        #[arg(long)]
        city: String,
    },
    /// Departures from a stop, in time order. Every departure of the feed without --stop
    Departures {
        #[arg(long)]
        city: String,
        #[arg(long)]
        stop: Option<String>,
        /// Service date as YYYY-MM-DD. Today (local time) when absent
        #[arg(long, requires = "stop")]
        date: Option<NaiveDate>,
    },
    /// Points of a shape, in sequence order. Every shape point of the feed without --shape
    Shape {
        #[arg(long)]
        city: String,
        #[arg(long)]
        shape: Option<String>,
    },
    /// Stream the departures of a feed to a file, one JSON object per line
    Export {
        #[arg(long)]
        city: String,
        #[arg(long)]
        out: PathBuf,
        #[arg(long)]
        batch_size: Option<usize>,
    },
    /// Load every feed and print how the decode went
    Stats,
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(command: Command, configuration: Configuration) -> anyhow::Result<()> {
    let store = FeedStore::new();
    match command {
        Command::Cities => print_json(&configuration.city_ids()),
        Command::Stops { city } => {
            ingest::load_city(&configuration, &store, &city).await?;
            print_json(&store.stops(&city))
        }
        Command::Routes { city } => {
            ingest::load_city(&configuration, &store, &city).await?;
            print_json(&store.routes(&city))
        }
        Command::Trips { city } => {
            ingest::load_city(&configuration, &store, &city).await?;
            print_json(&store.trips(&city))
        }
        Command::Departures { city, stop, date } => {
            ingest::load_city(&configuration, &store, &city).await?;
            match stop {
                Some(stop) => {
                    let date = date.unwrap_or_else(gtfs_schedule::today);
                    print_json(&store.departures(&city, &stop, date))
                }
                None => print_json(&store.all_departures(&city)),
            }
        }
        Command::Shape { city, shape } => {
            ingest::load_city(&configuration, &store, &city).await?;
            match shape {
                Some(shape) => print_json(&store.shape(&city, &shape)),
                None => print_json(&store.shapes(&city)),
            }
        }
        Command::Export {
            city,
            out,
            batch_size,
        } => {
            export::export_city(&configuration, &city, &out, batch_size).await?;
            Ok(())
        }
        Command::Stats => {
            ingest::load_all_feeds(&configuration, &store).await?;
            let reports: BTreeMap<String, DecodeReport> = store
                .cities()
                .into_iter()
                .filter_map(|city| {
                    let report = store.get(&city)?.report.clone();
                    Some((city, report))
                })
                .collect();
            print_json(&reports)
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let configuration = Configuration::load(args.config.as_deref())?;
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run(args.command, configuration))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::{CityFeed, FeedSource};
    use crate::test_fixtures::write_feed;
    use clap::CommandFactory;

    #[test]
    fn command_line() {
        Args::command().debug_assert();

        let args = Args::parse_from([
            "transit-schedule",
            "departures",
            "--city",
            "montreal",
            "--stop",
            "A",
            "--date",
            "2024-07-04",
        ]);
        match args.command {
            Command::Departures { city, stop, date } => {
                assert_eq!("montreal", city);
                assert_eq!(Some("A"), stop.as_deref());
                assert_eq!(NaiveDate::from_ymd_opt(2024, 7, 4), date);
            }
            c => panic!("unexpected command {:?}", c),
        }

        let args = Args::parse_from(["transit-schedule", "departures", "--city", "x"]);
        assert!(matches!(
            args.command,
            Command::Departures { stop: None, date: None, .. }
        ));
        let args = Args::parse_from(["transit-schedule", "shape", "--city", "x"]);
        assert!(matches!(args.command, Command::Shape { shape: None, .. }));
        let args = Args::parse_from(["transit-schedule", "trips", "--city", "x"]);
        assert!(matches!(args.command, Command::Trips { city } if city == "x"));
        // a date only makes sense for one stop
        assert!(Args::try_parse_from([
            "transit-schedule",
            "departures",
            "--city",
            "x",
            "--date",
            "2024-07-04"
        ])
        .is_err());
        assert!(Args::try_parse_from(["transit-schedule", "trips"]).is_err());
    }

    #[tokio::test]
    async fn departures_of_a_configured_city() {
        let configuration = Configuration {
            cities: vec![CityFeed {
                id: "test".to_owned(),
                source: FeedSource::Path(write_feed("main-departures")),
            }],
            batch_size: 100,
            fetch_timeout_secs: 1,
        };
        let store = FeedStore::new();
        assert!(ingest::load_city(&configuration, &store, "test")
            .await
            .expect("the feed loads"));

        // thursday, then saturday
        let thursday = NaiveDate::from_ymd_opt(2024, 7, 4).expect("valid date");
        let departures = store.departures("test", "A", thursday);
        let trips: Vec<&str> = departures.iter().map(|d| &*d.trip_id).collect();
        assert_eq!(vec!["T1"], trips);

        let saturday = NaiveDate::from_ymd_opt(2024, 7, 6).expect("valid date");
        let departures = store.departures("test", "A", saturday);
        let trips: Vec<&str> = departures.iter().map(|d| &*d.trip_id).collect();
        assert_eq!(vec!["T2"], trips);

        assert!(store.departures("other", "A", thursday).is_empty());
        assert_eq!(2, store.stops("test").len());
        assert_eq!(1, store.routes("test").len());
    }

    #[tokio::test]
    async fn whole_tables_of_a_configured_city() {
        let configuration = Configuration {
            cities: vec![CityFeed {
                id: "test".to_owned(),
                source: FeedSource::Path(write_feed("main-tables")),
            }],
            batch_size: 100,
            fetch_timeout_secs: 1,
        };
        let store = FeedStore::new();
        assert!(ingest::load_city(&configuration, &store, "test")
            .await
            .expect("the feed loads"));

        let trips: Vec<String> = store.trips("test").iter().map(|t| t.id.to_string()).collect();
        assert_eq!(vec!["T1", "T2"], trips);

        // both services, in file order
        let departures: Vec<String> = store
            .all_departures("test")
            .iter()
            .map(|d| format!("{}@{}", d.trip_id, d.stop_id))
            .collect();
        assert_eq!(vec!["T1@A", "T1@B", "T2@A"], departures);

        assert!(store.shapes("test").is_empty());
        assert!(store.trips("other").is_empty());
    }
}
