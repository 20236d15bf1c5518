//! WMO weather code tables
//!
//! See <https://open-meteo.com/en/docs> for the code reference.

/// Description used for codes outside the table
pub const UNKNOWN_DESCRIPTION: &str = "Tempo indefinido";

/// Icon used for codes outside the table
pub const DEFAULT_ICON: &str = "sol.png";

/// Portuguese description of a WMO weather code
///
/// Total: any code outside the table maps to [`UNKNOWN_DESCRIPTION`].
#[must_use]
pub const fn weather_description(code: i32) -> &'static str {
    match code {
        0 => "Céu limpo",
        1 => "Principalmente limpo",
        2 => "Parcialmente nublado",
        3 => "Nublado",
        45 => "Nevoeiro",
        48 => "Nevoeiro com geada",
        51 => "Garoa leve",
        53 => "Garoa moderada",
        55 => "Garoa forte",
        61 => "Chuva leve",
        63 => "Chuva moderada",
        65 => "Chuva forte",
        _ => UNKNOWN_DESCRIPTION,
    }
}

/// Icon file for a WMO weather code
///
/// Total: any code outside the table maps to [`DEFAULT_ICON`] (sunny).
#[must_use]
pub const fn weather_icon(code: i32) -> &'static str {
    match code {
        0 => "sol.png",
        1 | 2 => "sol entre nuvens.png",
        3 | 45 | 48 => "duas nuvens.png",
        51 | 53 => "chuva fraca.png",
        55 => "gotas.png",
        61 | 63 => "chuva.png",
        65 | 80 => "tempestade.png",
        95 | 96 | 99 => "tempestade com raio.png",
        _ => DEFAULT_ICON,
    }
}
