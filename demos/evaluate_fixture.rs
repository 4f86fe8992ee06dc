use valueref::dsl::{add, constant, mul, statistic, variable};
use valueref::{
    And, HasProperty, ObjectTypeIs, ScriptingContext, StatisticType, StringTable, Universe,
    UniverseObjectType, ValueRef,
};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let universe = Universe::from_json_str(include_str!("../tests/data/universe.json"))?;
    let strings = StringTable::from_json_str(include_str!("../tests/data/strings.json"))?;

    let producing = And(vec![
        Box::new(ObjectTypeIs(UniverseObjectType::Planet)),
        Box::new(HasProperty("Industry".to_owned())),
    ]);
    let mean = statistic::<i32>(StatisticType::Mean, "Industry", producing)?;
    let score: ValueRef<i32> = add(
        mul(variable("LocalCandidate.Industry")?, constant(2)),
        mean,
    );
    println!("{}", score.dump());
    println!("{}", score.description(&strings));

    let base = ScriptingContext::new(&universe);
    for candidate in universe.objects() {
        match score.eval(&base.nested(candidate)) {
            Ok(v) => println!("{} ({}): {v}", candidate.name, candidate.id),
            Err(e) => println!("{} ({}): {e}", candidate.name, candidate.id),
        }
    }

    Ok(())
}
