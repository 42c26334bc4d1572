use crate::directory::Station;

/// Curated stations for the "browse presets" menu path.
///
/// name, stream url, genre, country
const PRESETS: &[(&str, &str, &str, &str)] = &[
    (
        "SomaFM Groove Salad",
        "https://ice2.somafm.com/groovesalad-128-mp3",
        "ambient,downtempo",
        "USA",
    ),
    (
        "SomaFM Drone Zone",
        "https://ice2.somafm.com/dronezone-128-mp3",
        "ambient",
        "USA",
    ),
    (
        "Radio Paradise Main Mix",
        "http://stream.radioparadise.com/aac-320",
        "eclectic",
        "USA",
    ),
    (
        "FIP",
        "https://icecast.radiofrance.fr/fip-midfi.mp3",
        "eclectic,jazz",
        "France",
    ),
    (
        "FIP Jazz",
        "https://icecast.radiofrance.fr/fipjazz-midfi.mp3",
        "jazz",
        "France",
    ),
    (
        "Nightride FM",
        "https://stream.nightride.fm/nightride.mp3",
        "synthwave",
        "Germany",
    ),
    (
        "KEXP Seattle",
        "https://kexp-mp3-128.streamguys1.com/kexp128.mp3",
        "alternative,indie",
        "USA",
    ),
    (
        "Classic FM",
        "https://media-ice.musicradio.com/ClassicFMMP3",
        "classical",
        "UK",
    ),
];

pub fn all() -> Vec<Station> {
    PRESETS
        .iter()
        .map(|&(name, url, genre, country)| Station {
            name: name.to_string(),
            url: url.to_string(),
            genre: Some(genre.to_string()),
            country: Some(country.to_string()),
            bitrate: None,
            codec: None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_have_names_and_urls() {
        let stations = all();
        assert!(!stations.is_empty());
        for station in &stations {
            assert!(!station.name.trim().is_empty());
            assert!(
                station.url.starts_with("http://") || station.url.starts_with("https://"),
                "bad preset url: {}",
                station.url
            );
        }
    }
}
