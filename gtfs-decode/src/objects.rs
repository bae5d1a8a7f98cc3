use crate::enums::*;
use crate::archive::Table;
use crate::error::InvalidTime;
use crate::interner::Interner;
use crate::row::Row;
use chrono::{Datelike, NaiveDate, Weekday};
use serde::ser::Serializer;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// A record decoded from one row of a feed table
pub trait Record: Sized {
    /// Table the record is read from
    const TABLE: Table;

    /// Decodes a row. Never fails: malformed fields take their zero value
    fn decode(row: &mut Row<'_>, interner: &mut Interner) -> Self;
}

/// Time of the service day, in seconds since midnight
///
/// Trips running after midnight keep counting from the day they started, so values of
/// `24:00:00` and more are valid. This is never a wall-clock instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ServiceTime(u32);

impl ServiceTime {
    /// Time from a number of seconds since midnight
    pub const fn from_seconds(seconds: u32) -> Self {
        ServiceTime(seconds)
    }

    /// Time from hours, minutes and seconds. Hours may exceed 23
    pub const fn from_hms(hours: u32, minutes: u32, seconds: u32) -> Self {
        ServiceTime(hours * 3600 + minutes * 60 + seconds)
    }

    /// Seconds since midnight of the service day
    pub const fn seconds(self) -> u32 {
        self.0
    }

    /// True for times after midnight of the next calendar day
    pub const fn is_next_day(self) -> bool {
        self.0 >= 24 * 3600
    }
}

impl FromStr for ServiceTime {
    type Err = InvalidTime;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidTime(s.to_owned());
        let mut parts = s.trim().splitn(3, ':');
        let mut next = |max: Option<u32>| -> Result<u32, InvalidTime> {
            let part = parts.next().ok_or_else(invalid)?;
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            let value: u32 = part.parse().map_err(|_| invalid())?;
            match max {
                Some(max) if value >= max => Err(invalid()),
                _ => Ok(value),
            }
        };
        let hours = next(None)?;
        let minutes = next(Some(60))?;
        let seconds = next(Some(60))?;
        hours
            .checked_mul(3600)
            .and_then(|h| h.checked_add(minutes * 60 + seconds))
            .map(ServiceTime)
            .ok_or_else(invalid)
    }
}

impl fmt::Display for ServiceTime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.0 / 3600,
            self.0 % 3600 / 60,
            self.0 % 60
        )
    }
}

impl Serialize for ServiceTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

fn serialize_date<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&date.format("%Y%m%d").to_string())
}

/// A physical stop, station or area. See <https://gtfs.org/reference/static/#stopstxt>
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Stop {
    /// Unique technical identifier (not for the traveller) of the stop
    pub id: Arc<str>,
    /// Short text or a number that identifies the location for riders
    pub code: Arc<str>,
    /// Name of the location
    pub name: Arc<str>,
    /// Latitude of the stop
    pub latitude: f64,
    /// Longitude of the stop
    pub longitude: f64,
    /// URL of a web page about the location
    pub url: Arc<str>,
    /// Identifies the fare zone for a stop
    pub zone_id: Arc<str>,
    /// Defines hierarchy between the different locations
    pub parent_station: Arc<str>,
    /// Platform identifier for a platform stop (a stop belonging to a station)
    pub platform_code: Arc<str>,
    /// Indicates whether wheelchair boardings are possible from the location
    pub wheelchair_boarding: Availability,
    /// Type of the location
    pub location_type: LocationType,
}

impl Record for Stop {
    const TABLE: Table = Table::Stops;

    fn decode(row: &mut Row<'_>, interner: &mut Interner) -> Self {
        Stop {
            id: row.string("stop_id", interner),
            code: row.string("stop_code", interner),
            name: row.string("stop_name", interner),
            latitude: row.float("stop_lat"),
            longitude: row.float("stop_lon"),
            url: row.string("stop_url", interner),
            zone_id: row.string("zone_id", interner),
            parent_station: row.string("parent_station", interner),
            platform_code: row.string("platform_code", interner),
            wheelchair_boarding: Availability::from_code(row.code("wheelchair_boarding")),
            location_type: LocationType::from_code(row.code("location_type")),
        }
    }
}

impl fmt::Display for Stop {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A route is a commercial line. See <https://gtfs.org/reference/static/#routestxt>
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Route {
    /// Unique technical (not for the traveller) identifier for the route
    pub id: Arc<str>,
    /// Agency for the specified route
    pub agency_id: Arc<str>,
    /// Short name of a route, like "32", "100X", or "Green"
    pub short_name: Arc<str>,
    /// Full name of a route
    pub long_name: Arc<str>,
    /// Description of a route
    pub desc: Arc<str>,
    /// Indicates the type of transportation used on a route
    pub route_type: RouteType,
    /// URL of a web page about the particular route
    pub url: Arc<str>,
    /// Route color, `RRGGBB` without leading `#`, as written in the feed
    pub color: Arc<str>,
    /// Color of the text drawn over [Route::color]
    pub text_color: Arc<str>,
}

impl Record for Route {
    const TABLE: Table = Table::Routes;

    fn decode(row: &mut Row<'_>, interner: &mut Interner) -> Self {
        Route {
            id: row.string("route_id", interner),
            agency_id: row.string("agency_id", interner),
            short_name: row.string("route_short_name", interner),
            long_name: row.string("route_long_name", interner),
            desc: row.string("route_desc", interner),
            route_type: RouteType::from_code(row.code("route_type")),
            url: row.string("route_url", interner),
            color: row.string("route_color", interner),
            text_color: row.string("route_text_color", interner),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if !self.long_name.is_empty() {
            write!(f, "{}", self.long_name)
        } else {
            write!(f, "{}", self.short_name)
        }
    }
}

/// A Trip is a vehicle that follows a sequence of stops on certain days. See <https://gtfs.org/reference/static/#tripstxt>
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Trip {
    /// Unique technical identifier (not for the traveller) for the Trip
    pub id: Arc<str>,
    /// References along which [Route] this trip runs
    pub route_id: Arc<str>,
    /// References the service (see [Calendar] and [CalendarException]) on which this trip runs
    pub service_id: Arc<str>,
    /// Identifies the block to which the trip belongs
    pub block_id: Arc<str>,
    /// Text that appears on signage identifying the trip's destination to riders
    pub headsign: Arc<str>,
    /// Public facing text used to identify the trip to riders
    pub short_name: Arc<str>,
    /// Indicates the direction of travel for a trip
    pub direction_id: DirectionType,
    /// Shape of the trip
    pub shape_id: Arc<str>,
    /// Indicates wheelchair accessibility
    pub wheelchair_accessible: Availability,
    /// Indicates whether bikes are allowed
    pub bikes_allowed: Availability,
}

impl Record for Trip {
    const TABLE: Table = Table::Trips;

    fn decode(row: &mut Row<'_>, interner: &mut Interner) -> Self {
        Trip {
            id: row.string("trip_id", interner),
            route_id: row.string("route_id", interner),
            service_id: row.string("service_id", interner),
            block_id: row.string("block_id", interner),
            headsign: row.string("trip_headsign", interner),
            short_name: row.string("trip_short_name", interner),
            direction_id: DirectionType::from_code(row.code("direction_id")),
            shape_id: row.string("shape_id", interner),
            wheelchair_accessible: Availability::from_code(row.code("wheelchair_accessible")),
            bikes_allowed: Availability::from_code(row.code("bikes_allowed")),
        }
    }
}

impl fmt::Display for Trip {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "route id: {}, service id: {}",
            self.route_id, self.service_id
        )
    }
}

/// One scheduled visit of a [Trip] to a [Stop]. See <https://gtfs.org/reference/static/#stop_timestxt>
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Departure {
    /// [Trip] to which this stop time belongs to
    pub trip_id: Arc<str>,
    /// Identifier of the [Stop] where the vehicle stops
    pub stop_id: Arc<str>,
    /// Arrival time. `None` when the feed leaves it empty (or it is malformed)
    pub arrival_time: Option<ServiceTime>,
    /// Departure time. `None` when the feed leaves it empty (or it is malformed)
    pub departure_time: Option<ServiceTime>,
    /// Order of stops for a particular trip. The values increase along the trip but do not need to be consecutive
    pub stop_sequence: u32,
    /// Indicates pickup method
    pub pickup_type: PickupDropOffType,
    /// Indicates drop off method
    pub drop_off_type: PickupDropOffType,
}

impl Record for Departure {
    const TABLE: Table = Table::StopTimes;

    fn decode(row: &mut Row<'_>, interner: &mut Interner) -> Self {
        Departure {
            trip_id: row.string("trip_id", interner),
            stop_id: row.string("stop_id", interner),
            arrival_time: row.time("arrival_time"),
            departure_time: row.time("departure_time"),
            stop_sequence: row.unsigned("stop_sequence"),
            pickup_type: PickupDropOffType::from_code(row.code("pickup_type")),
            drop_off_type: PickupDropOffType::from_code(row.code("drop_off_type")),
        }
    }
}

/// A calender describes on which days the vehicle runs. See <https://gtfs.org/reference/static/#calendartxt>
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Calendar {
    /// Identifier of the service this weekly pattern belongs to
    pub service_id: Arc<str>,
    /// Does the service run on mondays
    pub monday: bool,
    /// Does the service run on tuesdays
    pub tuesday: bool,
    /// Does the service run on wednesdays
    pub wednesday: bool,
    /// Does the service run on thursdays
    pub thursday: bool,
    /// Does the service run on fridays
    pub friday: bool,
    /// Does the service run on saturdays
    pub saturday: bool,
    /// Does the service run on sundays
    pub sunday: bool,
    /// Start service day for the service interval
    #[serde(serialize_with = "serialize_date")]
    pub start_date: NaiveDate,
    /// End service day for the service interval. This service day is included in the interval
    #[serde(serialize_with = "serialize_date")]
    pub end_date: NaiveDate,
}

impl Record for Calendar {
    const TABLE: Table = Table::Calendar;

    fn decode(row: &mut Row<'_>, interner: &mut Interner) -> Self {
        Calendar {
            service_id: row.string("service_id", interner),
            monday: row.flag("monday"),
            tuesday: row.flag("tuesday"),
            wednesday: row.flag("wednesday"),
            thursday: row.flag("thursday"),
            friday: row.flag("friday"),
            saturday: row.flag("saturday"),
            sunday: row.flag("sunday"),
            start_date: row.date("start_date"),
            end_date: row.date("end_date"),
        }
    }
}

impl fmt::Display for Calendar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} to {}", self.start_date, self.end_date)
    }
}

impl Calendar {
    /// Returns true if the weekly pattern has a service on that weekday
    pub fn valid_weekday(&self, weekday: Weekday) -> bool {
        match weekday {
            Weekday::Mon => self.monday,
            Weekday::Tue => self.tuesday,
            Weekday::Wed => self.wednesday,
            Weekday::Thu => self.thursday,
            Weekday::Fri => self.friday,
            Weekday::Sat => self.saturday,
            Weekday::Sun => self.sunday,
        }
    }

    /// Is the date within `[start_date, end_date]`
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// The weekly pattern alone, without exceptions, runs on that date
    pub fn runs_on(&self, date: NaiveDate) -> bool {
        self.covers(date) && self.valid_weekday(date.weekday())
    }
}

/// Adds or removes a service on a specific date. See <https://gtfs.org/reference/static/#calendar_datestxt>
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct CalendarException {
    /// Identifier of the service that is modified at this date
    pub service_id: Arc<str>,
    /// Date where the service will be added or removed
    #[serde(serialize_with = "serialize_date")]
    pub date: NaiveDate,
    /// Is the service added or removed
    pub exception_type: Exception,
}

impl Record for CalendarException {
    const TABLE: Table = Table::CalendarDates;

    fn decode(row: &mut Row<'_>, interner: &mut Interner) -> Self {
        CalendarException {
            service_id: row.string("service_id", interner),
            date: row.date("date"),
            exception_type: Exception::from_code(row.code("exception_type")),
        }
    }
}

/// A single geographical point decribing the shape of a [Trip]. See <https://gtfs.org/reference/static/#shapestxt>
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ShapePoint {
    /// Identifier of the shape this point belongs to
    pub shape_id: Arc<str>,
    /// Latitude of a shape point
    pub latitude: f64,
    /// Longitude of a shape point
    pub longitude: f64,
    /// Sequence in which the shape points connect to form the shape
    pub sequence: u32,
}

impl Record for ShapePoint {
    const TABLE: Table = Table::Shapes;

    fn decode(row: &mut Row<'_>, interner: &mut Interner) -> Self {
        ShapePoint {
            shape_id: row.string("shape_id", interner),
            latitude: row.float("shape_pt_lat"),
            longitude: row.float("shape_pt_lon"),
            sequence: row.unsigned("shape_pt_sequence"),
        }
    }
}
