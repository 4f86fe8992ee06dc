use super::*;
use crate::foundation::core::ObjectId;

#[test]
fn from_value_checks_kind() {
    assert_eq!(i32::from_value(&Value::Int(4)).unwrap(), 4);
    assert_eq!(i32::from_value(&Value::Object(ObjectId(8))).unwrap(), 8);
    assert_eq!(f64::from_value(&Value::Int(4)).unwrap(), 4.0);
    assert_eq!(
        PlanetType::from_value(&Value::PlanetType(PlanetType::Tundra)).unwrap(),
        PlanetType::Tundra
    );

    let err = i32::from_value(&Value::Double(1.5)).unwrap_err();
    assert!(matches!(
        err,
        ValueRefError::TypeMismatch {
            expected: ValueKind::Int,
            found: ValueKind::Double
        }
    ));
    assert!(StarType::from_value(&Value::PlanetSize(PlanetSize::Tiny)).is_err());
}

#[test]
fn literals_in_script_syntax() {
    assert_eq!(42i32.dump_literal(), "42");
    assert_eq!(3.0f64.dump_literal(), "3.0");
    assert_eq!(0.125f64.dump_literal(), "0.125");
    assert_eq!("Human".to_owned().dump_literal(), "\"Human\"");
    assert_eq!(StarType::Neutron.dump_literal(), "Neutron");
}

#[test]
fn descriptions_are_localized() {
    let strings = StringTable::new()
        .with("PE_GOOD", "good")
        .with("SP_HUMAN", "Human");
    assert_eq!(PlanetEnvironment::Good.describe(&strings), "good");
    assert_eq!("SP_HUMAN".to_owned().describe(&strings), "Human");
    assert_eq!(7i32.describe(&strings), "7");
    assert_eq!(2.0f64.describe(&strings), "2");
    assert_eq!(1.23456f64.describe(&strings), "1.235");
    assert_eq!(0.5f64.describe(&strings), "0.5");
    assert_eq!((-0.0001f64).describe(&strings), "0");
    assert_eq!((-0.0f64).describe(&strings), "0");
    assert_eq!((-0.25f64).describe(&strings), "-0.25");
}

#[test]
fn integer_helpers() {
    assert_eq!(<i32 as Numeric>::from_f64(-3.99).unwrap(), -3);
    assert!(<i32 as Numeric>::from_f64(f64::INFINITY).is_err());
    assert!(<i32 as Numeric>::from_f64(3e9).is_err());
    assert_eq!(<i32 as Numeric>::checked_pow(3, 3), Some(27));
    assert_eq!(<i32 as Numeric>::checked_pow(2, -2), Some(0));
    assert_eq!(<i32 as Numeric>::uniform(1, 6, 0.0), Some(1));
    assert_eq!(<i32 as Numeric>::uniform(1, 6, 0.999_999), Some(6));
    assert_eq!(<i32 as Numeric>::uniform(i32::MIN, i32::MAX, 0.5), Some(0));
}

#[test]
fn double_helpers() {
    assert_eq!(<f64 as Numeric>::checked_add(1.0, 2.0), Some(3.0));
    assert_eq!(<f64 as Numeric>::checked_div(1.0, 0.0), None);
    assert_eq!(<f64 as Numeric>::uniform(2.0, 4.0, 0.5), Some(3.0));
    assert!(<f64 as Numeric>::uniform(-f64::MAX, f64::MAX, 0.75).is_some_and(f64::is_finite));
    assert_eq!(<f64 as Numeric>::uniform(f64::NEG_INFINITY, 1.0, 0.5), None);
    assert_eq!(1.5f64.key(), 1.5f64.key());
    assert!(<f64 as Numeric>::from_f64(f64::NAN).is_err());
}

#[test]
fn statistic_support_by_family() {
    for stat in StatisticType::ALL {
        assert!(i32::supports_statistic(stat));
        assert!(f64::supports_statistic(stat));
        assert_eq!(String::supports_statistic(stat), stat == StatisticType::Mode);
        assert_eq!(
            PlanetSize::supports_statistic(stat),
            matches!(
                stat,
                StatisticType::Mode | StatisticType::Max | StatisticType::Min
            )
        );
    }
}

#[test]
fn enum_static_cast_from_numbers() {
    assert_eq!(
        UniverseObjectType::static_cast(Value::Int(6)).unwrap(),
        UniverseObjectType::System
    );
    assert_eq!(
        UniverseObjectType::static_cast(Value::Double(1.7)).unwrap(),
        UniverseObjectType::Ship
    );
    assert_eq!(
        PlanetSize::static_cast(Value::Int(-1)).unwrap(),
        PlanetSize::Invalid
    );
    assert!(PlanetSize::static_cast(Value::StarType(StarType::Red)).is_err());
}
