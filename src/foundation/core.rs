use std::fmt;

/// Stable identifier of an object in the [`crate::Universe`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct ObjectId(pub i32);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

macro_rules! game_enum {
    (
        $(#[$meta:meta])*
        $name:ident as $value:ident {
            $( $variant:ident = ($code:literal, $keyword:literal, $key:literal) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        ///
        /// Members are ordered by declaration; `Invalid` sorts first.
        #[derive(
            Clone,
            Copy,
            Debug,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            serde::Serialize,
            serde::Deserialize,
        )]
        pub enum $name {
            /// No valid value (integer code `-1`).
            Invalid,
            $(
                #[doc = concat!("`", $keyword, "`")]
                $variant,
            )+
        }

        impl $name {
            /// Every valid member, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Integer code used by integer casts.
            pub fn code(self) -> i32 {
                match self {
                    Self::Invalid => -1,
                    $(Self::$variant => $code,)+
                }
            }

            /// Inverse of [`Self::code`].
            pub fn from_code(code: i32) -> Option<Self> {
                match code {
                    -1 => Some(Self::Invalid),
                    $($code => Some(Self::$variant),)+
                    _ => None,
                }
            }

            /// Script keyword used by `dump`.
            pub fn keyword(self) -> &'static str {
                match self {
                    Self::Invalid => "Invalid",
                    $(Self::$variant => $keyword,)+
                }
            }

            /// String-table key used by `description`.
            pub fn string_key(self) -> &'static str {
                match self {
                    Self::Invalid => "INVALID",
                    $(Self::$variant => $key,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.keyword())
            }
        }

        impl From<$name> for Value {
            fn from(v: $name) -> Self {
                Self::$value(v)
            }
        }
    };
}

game_enum! {
    /// Planet size class.
    PlanetSize as PlanetSize {
        NoWorld = (0, "NoWorld", "SZ_NOWORLD"),
        Tiny = (1, "Tiny", "SZ_TINY"),
        Small = (2, "Small", "SZ_SMALL"),
        Medium = (3, "Medium", "SZ_MEDIUM"),
        Large = (4, "Large", "SZ_LARGE"),
        Huge = (5, "Huge", "SZ_HUGE"),
        Asteroids = (6, "Asteroids", "SZ_ASTEROIDS"),
        GasGiant = (7, "GasGiant", "SZ_GASGIANT"),
    }
}

game_enum! {
    /// Planet surface type.
    PlanetType as PlanetType {
        Swamp = (0, "Swamp", "PT_SWAMP"),
        Toxic = (1, "Toxic", "PT_TOXIC"),
        Inferno = (2, "Inferno", "PT_INFERNO"),
        Radiated = (3, "Radiated", "PT_RADIATED"),
        Barren = (4, "Barren", "PT_BARREN"),
        Tundra = (5, "Tundra", "PT_TUNDRA"),
        Desert = (6, "Desert", "PT_DESERT"),
        Terran = (7, "Terran", "PT_TERRAN"),
        Ocean = (8, "Ocean", "PT_OCEAN"),
        Asteroids = (9, "Asteroids", "PT_ASTEROIDS"),
        GasGiant = (10, "GasGiant", "PT_GASGIANT"),
    }
}

game_enum! {
    /// How hospitable a planet is to a species.
    PlanetEnvironment as PlanetEnvironment {
        Uninhabitable = (0, "Uninhabitable", "PE_UNINHABITABLE"),
        Hostile = (1, "Hostile", "PE_HOSTILE"),
        Poor = (2, "Poor", "PE_POOR"),
        Adequate = (3, "Adequate", "PE_ADEQUATE"),
        Good = (4, "Good", "PE_GOOD"),
    }
}

game_enum! {
    /// Concrete kind of a universe object.
    UniverseObjectType as ObjectType {
        Building = (0, "Building", "OBJ_BUILDING"),
        Ship = (1, "Ship", "OBJ_SHIP"),
        Fleet = (2, "Fleet", "OBJ_FLEET"),
        Planet = (3, "Planet", "OBJ_PLANET"),
        PopCenter = (4, "PopCenter", "OBJ_POP_CENTER"),
        ProdCenter = (5, "ProdCenter", "OBJ_PROD_CENTER"),
        System = (6, "System", "OBJ_SYSTEM"),
        Field = (7, "Field", "OBJ_FIELD"),
    }
}

game_enum! {
    /// Star colour class.
    StarType as StarType {
        Blue = (0, "Blue", "STAR_BLUE"),
        White = (1, "White", "STAR_WHITE"),
        Yellow = (2, "Yellow", "STAR_YELLOW"),
        Orange = (3, "Orange", "STAR_ORANGE"),
        Red = (4, "Red", "STAR_RED"),
        Neutron = (5, "Neutron", "STAR_NEUTRON"),
        BlackHole = (6, "BlackHole", "STAR_BLACK"),
        NoStar = (7, "NoStar", "STAR_NONE"),
    }
}

/// Type tag of a [`Value`], and of an expression's declared result type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ValueKind {
    /// `i32`
    Int,
    /// `f64`
    Double,
    /// `String`
    Text,
    /// [`PlanetSize`]
    PlanetSize,
    /// [`PlanetType`]
    PlanetType,
    /// [`PlanetEnvironment`]
    PlanetEnvironment,
    /// [`UniverseObjectType`]
    ObjectType,
    /// [`StarType`]
    StarType,
    /// Link to another object, only found in object properties.
    Object,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Int => "int",
            Self::Double => "double",
            Self::Text => "string",
            Self::PlanetSize => "planet size",
            Self::PlanetType => "planet type",
            Self::PlanetEnvironment => "planet environment",
            Self::ObjectType => "object type",
            Self::StarType => "star type",
            Self::Object => "object",
        })
    }
}

/// Dynamically typed carrier for property values and the context's current value.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Value {
    /// Integer value.
    Int(i32),
    /// Floating-point value.
    Double(f64),
    /// Text value.
    Text(String),
    /// Planet size.
    PlanetSize(PlanetSize),
    /// Planet type.
    PlanetType(PlanetType),
    /// Planet environment.
    PlanetEnvironment(PlanetEnvironment),
    /// Object type.
    ObjectType(UniverseObjectType),
    /// Star type.
    StarType(StarType),
    /// Link to another object, followed by dotted property paths.
    Object(ObjectId),
}

impl Value {
    /// Type tag of the carried value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Int(_) => ValueKind::Int,
            Self::Double(_) => ValueKind::Double,
            Self::Text(_) => ValueKind::Text,
            Self::PlanetSize(_) => ValueKind::PlanetSize,
            Self::PlanetType(_) => ValueKind::PlanetType,
            Self::PlanetEnvironment(_) => ValueKind::PlanetEnvironment,
            Self::ObjectType(_) => ValueKind::ObjectType,
            Self::StarType(_) => ValueKind::StarType,
            Self::Object(_) => ValueKind::Object,
        }
    }
}

/// Canonical text form, used by string casts.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Double(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
            Self::PlanetSize(v) => write!(f, "{v}"),
            Self::PlanetType(v) => write!(f, "{v}"),
            Self::PlanetEnvironment(v) => write!(f, "{v}"),
            Self::ObjectType(v) => write!(f, "{v}"),
            Self::StarType(v) => write!(f, "{v}"),
            Self::Object(id) => write!(f, "{id}"),
        }
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

impl From<ObjectId> for Value {
    fn from(v: ObjectId) -> Self {
        Self::Object(v)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
