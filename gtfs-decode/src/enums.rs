use serde::ser::{Serialize, Serializer};

/// Declares an enumeration stored as an integer code in the feed
///
/// Unknown codes are kept in an `Unknown` (or `Other`) variant instead of being rejected.
/// The variant of code `0` is the default, since a missing or malformed field reads as `0`.
macro_rules! code_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $code:literal, )+
        }
        $(#[$umeta:meta])* else $unknown:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
            $(#[$umeta])* $unknown(i32),
        }

        impl $name {
            /// Enumeration value of an integer code
            pub fn from_code(code: i32) -> Self {
                match code {
                    $( $code => $name::$variant, )+
                    other => $name::$unknown(other),
                }
            }

            /// Integer code as written in the feed
            pub fn code(self) -> i32 {
                match self {
                    $( $name::$variant => $code, )+
                    $name::$unknown(other) => other,
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::from_code(0)
            }
        }

        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                serializer.serialize_i32(self.code())
            }
        }
    };
}

code_enum! {
    /// Describes the kind of [crate::Stop]. See <https://gtfs.org/reference/static/#stopstxt> `location_type`
    pub enum LocationType {
        /// Stop (or Platform). A location where passengers board or disembark from a transit vehicle
        StopPoint = 0,
        /// Station. A physical structure or area that contains one or more platform
        StopArea = 1,
        /// A location where passengers can enter or exit a station from the street
        StationEntrance = 2,
        /// A location within a station used to link together pathways
        GenericNode = 3,
        /// A specific location on a platform, where passengers can board and/or alight vehicles
        BoardingArea = 4,
    }
    /// An unknown value
    else Unknown
}

code_enum! {
    /// Describes the kind of [crate::Route]. See <https://gtfs.org/reference/static/#routestxt> `route_type`
    pub enum RouteType {
        /// Tram, Streetcar, Light rail
        Tramway = 0,
        /// Subway, Metro
        Subway = 1,
        /// Used for intercity or long-distance travel
        Rail = 2,
        /// Used for short- and long-distance bus routes
        Bus = 3,
        /// Used for short- and long-distance boat service
        Ferry = 4,
        /// Street-level rail cars where the cable runs beneath the vehicle
        CableCar = 5,
        /// Aerial lift, suspended cable car
        Gondola = 6,
        /// Any rail system designed for steep inclines
        Funicular = 7,
        /// Electric buses that draw power from overhead wires
        Trolleybus = 11,
        /// Railway in which the track consists of a single rail or a beam
        Monorail = 12,
    }
    /// Any other value, including extended route types
    else Other
}

code_enum! {
    /// Is the stop or the vehicle accessible. Used for wheelchairs and bikes
    pub enum Availability {
        /// No information
        InformationNotAvailable = 0,
        /// Accessible
        Available = 1,
        /// Not accessible
        NotAvailable = 2,
    }
    /// An unknown value
    else Unknown
}

code_enum! {
    /// Describes if and how a traveller can board or alight the vehicle. See <https://gtfs.org/reference/static/#stop_timestxt>
    pub enum PickupDropOffType {
        /// Regularly scheduled pickup or drop off
        Regular = 0,
        /// No pickup or drop off available
        NotAvailable = 1,
        /// Must phone agency to arrange pickup or drop off
        ArrangeByPhone = 2,
        /// Must coordinate with driver to arrange pickup or drop off
        CoordinateWithDriver = 3,
    }
    /// An unknown value
    else Unknown
}

code_enum! {
    /// Direction of travel of a [crate::Trip]
    pub enum DirectionType {
        /// Travel in one direction (e.g. outbound travel)
        Outbound = 0,
        /// Travel in the opposite direction (e.g. inbound travel)
        Inbound = 1,
    }
    /// An unknown value
    else Unknown
}

code_enum! {
    /// Whether a [crate::CalendarException] adds or removes a service on its date
    pub enum Exception {
        /// The service runs on that date
        Added = 1,
        /// The service does not run on that date
        Removed = 2,
    }
    /// Any other code, including a missing one. Such an exception has no effect
    else Unknown
}
