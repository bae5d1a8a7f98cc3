use std::io::{Cursor, Write};
use std::path::PathBuf;

const FILES: [(&str, &str); 5] = [
    (
        "stops.txt",
        "stop_id,stop_name,stop_lat,stop_lon\nA,Central,45.5,-73.6\nB,Market,45.51,-73.59\n",
    ),
    ("routes.txt", "route_id,route_type\nR1,3\n"),
    ("trips.txt", "route_id,service_id,trip_id,shape_id\nR1,WD,T1,SH\nR1,WE,T2,SH\n"),
    (
        "stop_times.txt",
        "trip_id,departure_time,stop_id,stop_sequence\nT1,08:00:00,A,1\nT1,08:10:00,B,2\nT2,09:00:00,A,1\n",
    ),
    (
        "calendar.txt",
        "service_id,monday,tuesday,wednesday,thursday,friday,saturday,sunday,start_date,end_date\nWD,1,1,1,1,1,0,0,20240101,20241231\nWE,0,0,0,0,0,1,1,20240101,20241231\n",
    ),
];

/// A small feed archive: a weekday trip and a weekend trip through stop A
pub fn feed_bytes() -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in FILES {
        writer
            .start_file(name, zip::write::FileOptions::default())
            .expect("impossible to start zip entry");
        writer
            .write_all(content.as_bytes())
            .expect("impossible to write zip entry");
    }
    writer.finish().expect("impossible to finish zip").into_inner()
}

/// Writes [feed_bytes] to a temporary file named after `name`
pub fn write_feed(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "transit-schedule-{}-{}.zip",
        name,
        std::process::id()
    ));
    std::fs::write(&path, feed_bytes()).expect("impossible to write fixture");
    path
}
