//! Vehicle classification: type, size and the translation of plate-lookup
//! segments into both.

use serde::{Deserialize, Serialize};

/// Kind of vehicle. Prices are tabulated per type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "arycar.vehicle_type", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum VehicleType {
    Carro,
    Moto,
    Caminhao,
}

impl VehicleType {
    /// All vehicle types.
    pub const ALL: [Self; 3] = [Self::Carro, Self::Moto, Self::Caminhao];

    /// Label shown to staff.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Carro => "Carro",
            Self::Moto => "Moto",
            Self::Caminhao => "Caminhão",
        }
    }

    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Carro => "carro",
            Self::Moto => "moto",
            Self::Caminhao => "caminhao",
        }
    }

    /// Path segment used by the FIPE catalog API.
    #[must_use]
    pub const fn fipe_segment(self) -> &'static str {
        match self {
            Self::Carro => "carros",
            Self::Moto => "motos",
            Self::Caminhao => "caminhoes",
        }
    }

    /// Classify a plate-lookup record. `tipo_veiculo` wins when present,
    /// otherwise `segmento` is used; anything unrecognized is a car.
    #[must_use]
    pub fn from_lookup(tipo_veiculo: &str, segmento: &str) -> Self {
        let source = if tipo_veiculo.trim().is_empty() {
            segmento
        } else {
            tipo_veiculo
        };
        let upper = source.to_uppercase();
        if upper.contains("MOTO") || upper.contains("CICLOMOTOR") {
            Self::Moto
        } else if ["CAMINHÃO", "CAMINHAO", "ONIBUS", "ÔNIBUS"]
            .iter()
            .any(|k| upper.contains(k))
        {
            Self::Caminhao
        } else {
            Self::Carro
        }
    }
}

impl std::fmt::Display for VehicleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for VehicleType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "carro" => Ok(Self::Carro),
            "moto" => Ok(Self::Moto),
            "caminhao" => Ok(Self::Caminhao),
            _ => Err(format!("invalid vehicle type: {s}")),
        }
    }
}

/// Vehicle size class (porte). Each service has one price per size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(feature = "postgres", sqlx(type_name = "arycar.vehicle_size"))]
pub enum VehicleSize {
    /// Pequeno: hatch / compact sedan.
    P,
    /// Médio: sedan / compact SUV.
    M,
    /// Grande: SUV / pickup / van.
    G,
}

impl VehicleSize {
    /// All sizes, smallest first.
    pub const ALL: [Self; 3] = [Self::P, Self::M, Self::G];

    /// Label shown to staff.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::P => "Pequeno",
            Self::M => "Médio",
            Self::G => "Grande",
        }
    }

    /// Example body styles for the size picker.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::P => "Hatch / Sedan compacto",
            Self::M => "Sedan / SUV compacto",
            Self::G => "SUV / Picape / Van",
        }
    }

    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::P => "P",
            Self::M => "M",
            Self::G => "G",
        }
    }

    /// Infer the size from the `sub_segmento` of a plate-lookup record.
    ///
    /// Rules are checked in order, so `"SUV COMPACTO"` is large. Unknown
    /// segments default to medium.
    #[must_use]
    pub fn from_sub_segment(sub_segmento: &str) -> Self {
        let upper = sub_segmento.to_uppercase();
        let has_any = |keys: &[&str]| keys.iter().any(|k| upper.contains(k));

        if has_any(&["SUV", "PICKUP", "UTILITARIO", "UTILITÁRIO"]) {
            Self::G
        } else if has_any(&["SEDAN", "HATCH", "COMPACTO"]) {
            Self::M
        } else if has_any(&["MOTO", "CICLOMOTOR", "TRICICLO"]) {
            Self::P
        } else {
            Self::M
        }
    }
}

impl std::fmt::Display for VehicleSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for VehicleSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "P" | "p" => Ok(Self::P),
            "M" | "m" => Ok(Self::M),
            "G" | "g" => Ok(Self::G),
            _ => Err(format!("invalid vehicle size: {s}")),
        }
    }
}
