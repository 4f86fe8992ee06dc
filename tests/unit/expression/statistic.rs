use super::*;
use crate::foundation::core::{ObjectId, PlanetSize, UniverseObjectType};
use crate::universe::condition::{All, HasProperty, ObjectTypeIs, SourceObject};
use crate::universe::object::{Universe, UniverseObject};

fn planets(values: &[i32]) -> Universe {
    let mut u = Universe::new();
    for (i, v) in values.iter().enumerate() {
        let id = i32::try_from(i).unwrap() + 1;
        u.insert(
            UniverseObject::new(ObjectId(id), UniverseObjectType::Planet, format!("p{id}"))
                .with_property("Industry", *v)
                .with_property("Farming", f64::from(*v) / 2.0),
        );
    }
    u
}

fn eval_int(stat: StatisticType, values: &[i32]) -> i32 {
    let u = planets(values);
    Statistic::<i32>::new("Industry", stat, Box::new(All))
        .unwrap()
        .eval(&ScriptingContext::new(&u))
        .unwrap()
}

fn eval_double(stat: StatisticType, values: &[i32]) -> f64 {
    let u = planets(values);
    Statistic::<f64>::new("Industry", stat, Box::new(All))
        .unwrap()
        .eval(&ScriptingContext::new(&u))
        .unwrap()
}

#[test]
fn count_ignores_values() {
    assert_eq!(eval_int(StatisticType::Count, &[5, 5, 9]), 3);
    assert_eq!(eval_int(StatisticType::Count, &[]), 0);
    assert_eq!(eval_int(StatisticType::If, &[1]), 1);
    assert_eq!(eval_int(StatisticType::If, &[]), 0);
}

#[test]
fn sum_mean_stdev_over_two_four_six() {
    assert_eq!(eval_int(StatisticType::Sum, &[2, 4, 6]), 12);
    assert_eq!(eval_int(StatisticType::Mean, &[2, 4, 6]), 4);
    assert!((eval_double(StatisticType::Stdev, &[2, 4, 6]) - 2.0).abs() < 1e-12);
    assert_eq!(eval_double(StatisticType::Stdev, &[5]), 0.0);
    assert_eq!(eval_int(StatisticType::Stdev, &[2, 4, 6]), 2);
}

#[test]
fn mean_uses_result_type_arithmetic() {
    assert_eq!(eval_int(StatisticType::Mean, &[1, 2]), 1);
    assert_eq!(eval_double(StatisticType::Mean, &[1, 2]), 1.5);
}

#[test]
fn mode_tie_break_is_first_to_reach_max() {
    assert_eq!(eval_int(StatisticType::Mode, &[1, 1, 2, 3]), 1);
    assert_eq!(eval_int(StatisticType::Mode, &[1, 2, 3]), 1);
    assert_eq!(eval_int(StatisticType::Mode, &[3, 2, 2, 3]), 2);
}

#[test]
fn extremes_spread_and_unique() {
    let vals = [4, -2, 9, 9, 0];
    assert_eq!(eval_int(StatisticType::Max, &vals), 9);
    assert_eq!(eval_int(StatisticType::Min, &vals), -2);
    assert_eq!(eval_int(StatisticType::Spread, &vals), 11);
    assert_eq!(eval_int(StatisticType::UniqueCount, &vals), 4);
    assert_eq!(eval_int(StatisticType::Product, &[2, 3, 4]), 24);
    assert!((eval_double(StatisticType::Rms, &[3, 4]) - 12.5f64.sqrt()).abs() < 1e-12);
}

#[test]
fn empty_input_sentinels() {
    for stat in StatisticType::ALL {
        let expected = if stat == StatisticType::Product { 1 } else { 0 };
        assert_eq!(eval_int(stat, &[]), expected, "{stat}");
    }
}

#[test]
fn overflow_is_an_arithmetic_error() {
    let u = planets(&[i32::MAX, 1]);
    let err = Statistic::<i32>::new("Industry", StatisticType::Sum, Box::new(All))
        .unwrap()
        .eval(&ScriptingContext::new(&u))
        .unwrap_err();
    assert!(matches!(err, ValueRefError::Arithmetic(_)));
}

#[test]
fn values_read_through_local_candidate() {
    let u = planets(&[2, 4]);
    let stat = Statistic::<f64>::new("Farming", StatisticType::Sum, Box::new(All)).unwrap();
    assert_eq!(stat.eval(&ScriptingContext::new(&u)).unwrap(), 3.0);

    let ids = Statistic::<i32>::new("ID", StatisticType::Sum, Box::new(All)).unwrap();
    assert_eq!(ids.eval(&ScriptingContext::new(&u)).unwrap(), 3);
}

#[test]
fn missing_property_on_a_match_fails() {
    let mut u = planets(&[1]);
    u.insert(UniverseObject::new(ObjectId(9), UniverseObjectType::Ship, "s"));
    let stat = Statistic::<i32>::new("Industry", StatisticType::Sum, Box::new(All)).unwrap();
    assert!(stat.eval(&ScriptingContext::new(&u)).is_err());

    let only_planets = Statistic::<i32>::new(
        "Industry",
        StatisticType::Sum,
        Box::new(ObjectTypeIs(UniverseObjectType::Planet)),
    )
    .unwrap();
    assert_eq!(only_planets.eval(&ScriptingContext::new(&u)).unwrap(), 1);
}

#[test]
fn enum_statistics() {
    let mut u = Universe::new();
    for (id, size) in [
        (1, PlanetSize::Small),
        (2, PlanetSize::Huge),
        (3, PlanetSize::Small),
    ] {
        u.insert(
            UniverseObject::new(ObjectId(id), UniverseObjectType::Planet, "p")
                .with_property("Size", size),
        );
    }
    let ctx = ScriptingContext::new(&u);
    let run = |stat| {
        Statistic::<PlanetSize>::new("Size", stat, Box::new(All))
            .unwrap()
            .eval(&ctx)
    };
    assert_eq!(run(StatisticType::Mode).unwrap(), PlanetSize::Small);
    assert_eq!(run(StatisticType::Max).unwrap(), PlanetSize::Huge);
    assert_eq!(run(StatisticType::Min).unwrap(), PlanetSize::Small);
    assert!(matches!(
        run(StatisticType::Sum).unwrap_err(),
        ValueRefError::InvalidOperation(_)
    ));

    let empty = Universe::new();
    let none = Statistic::<PlanetSize>::new("Size", StatisticType::Max, Box::new(All))
        .unwrap()
        .eval(&ScriptingContext::new(&empty))
        .unwrap();
    assert_eq!(none, PlanetSize::Invalid);
}

#[test]
fn text_supports_mode_only() {
    let mut u = Universe::new();
    for (id, species) in [(1, "Human"), (2, "Laenfa"), (3, "Laenfa")] {
        u.insert(
            UniverseObject::new(ObjectId(id), UniverseObjectType::Planet, "p")
                .with_property("Species", species),
        );
    }
    let ctx = ScriptingContext::new(&u);
    let mode = Statistic::<String>::new("Species", StatisticType::Mode, Box::new(All)).unwrap();
    assert_eq!(mode.eval(&ctx).unwrap(), "Laenfa");

    let count = Statistic::<String>::new("", StatisticType::Count, Box::new(All)).unwrap();
    assert!(matches!(
        count.eval(&ctx).unwrap_err(),
        ValueRefError::InvalidOperation(_)
    ));
}

#[test]
fn invariance_combines_condition() {
    let free = Statistic::<i32>::new("Industry", StatisticType::Sum, Box::new(All)).unwrap();
    assert_eq!(free.invariance(), Invariance::ALL);

    let sourced =
        Statistic::<i32>::new("Industry", StatisticType::Sum, Box::new(SourceObject)).unwrap();
    let inv = sourced.invariance();
    assert!(!inv.source);
    assert!(inv.local_candidate);
    assert!(inv.target);
    assert!(inv.root_candidate);
}

#[test]
fn construction_checks_property() {
    assert!(Statistic::<i32>::new("", StatisticType::Sum, Box::new(All)).is_err());
    assert!(Statistic::<i32>::new("Owner..ID", StatisticType::Max, Box::new(All)).is_err());
    assert!(Statistic::<i32>::new("", StatisticType::If, Box::new(All)).is_ok());
}

#[test]
fn equality_compares_condition() {
    let a = Statistic::<i32>::new("Industry", StatisticType::Sum, Box::new(All)).unwrap();
    let b = Statistic::<i32>::new("Industry", StatisticType::Sum, Box::new(All)).unwrap();
    let c = Statistic::<i32>::new(
        "Industry",
        StatisticType::Sum,
        Box::new(HasProperty("Industry".to_owned())),
    )
    .unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn dump_and_description() {
    let sum = Statistic::<i32>::new(
        "Industry",
        StatisticType::Sum,
        Box::new(ObjectTypeIs(UniverseObjectType::Planet)),
    )
    .unwrap();
    assert_eq!(
        sum.dump(),
        "Statistic Sum value = Industry condition = Planet"
    );
    let count = Statistic::<i32>::new("", StatisticType::Count, Box::new(All)).unwrap();
    assert_eq!(count.dump(), "Statistic Count condition = All");

    let strings = StringTable::new()
        .with("DESC_STATISTIC", "%1% of %2% over %3%")
        .with("DESC_STAT_SUM", "total")
        .with("DESC_VALUE_REF_MULTIPART_VARIABLE1", "%2%")
        .with("DESC_VAR_INDUSTRY", "industry")
        .with("OBJ_PLANET", "planets");
    assert_eq!(sum.description(&strings), "total of industry over planets");
}

#[test]
fn mode_helper_on_raw_values() {
    assert_eq!(mode::<i32>(&[]), None);
    assert_eq!(mode(&[2.5, 1.0, 1.0]), Some(1.0));
}
