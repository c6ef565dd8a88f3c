use serde::Deserialize;

/// The elements of the first three periods. The discriminant is the atomic
/// number, so casting gives the nuclear charge.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
#[rustfmt::skip]
pub enum ElementType {
    H = 1, He,
    Li, Be, B, C, N, O, F, Ne,
    Na, Mg, Al, Si, P, S, Cl, Ar,
}

impl ElementType {
    pub const ALL: [Self; 18] = [
        Self::H,
        Self::He,
        Self::Li,
        Self::Be,
        Self::B,
        Self::C,
        Self::N,
        Self::O,
        Self::F,
        Self::Ne,
        Self::Na,
        Self::Mg,
        Self::Al,
        Self::Si,
        Self::P,
        Self::S,
        Self::Cl,
        Self::Ar,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            Self::H => "H",
            Self::He => "He",
            Self::Li => "Li",
            Self::Be => "Be",
            Self::B => "B",
            Self::C => "C",
            Self::N => "N",
            Self::O => "O",
            Self::F => "F",
            Self::Ne => "Ne",
            Self::Na => "Na",
            Self::Mg => "Mg",
            Self::Al => "Al",
            Self::Si => "Si",
            Self::P => "P",
            Self::S => "S",
            Self::Cl => "Cl",
            Self::Ar => "Ar",
        }
    }

    pub fn atomic_number(self) -> u32 {
        self as u32
    }
}

/// Element names appear both as symbols ("N") and as atomic number strings
/// ("7", the convention of the basis set exchange JSON files).
impl TryFrom<String> for ElementType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if let Ok(number) = value.parse::<u32>() {
            return Self::ALL
                .into_iter()
                .find(|element| element.atomic_number() == number)
                .ok_or_else(|| format!("unsupported atomic number {number}"));
        }

        Self::ALL
            .into_iter()
            .find(|element| element.symbol() == value)
            .ok_or_else(|| format!("unknown element symbol {value:?}"))
    }
}
