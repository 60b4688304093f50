//! The reference scenario under every strategy.

use std::rc::Rc;
use std::time::Duration;

use flatten_concurrency::catalog::{Catalog, Hobby, Person};
use flatten_concurrency::sink::Visor;
use flatten_concurrency::time::{Clock, Runtime};
use flatten_concurrency::{pipeline, run, Config, Record, Strategy};
use futures_lite::StreamExt;
use itertools::Itertools;

/// Run `config` and return every record with the virtual time it arrived at.
fn timeline(catalog: Catalog, config: &Config) -> Vec<(Duration, Record)> {
    let clock = Clock::new();
    let runtime = Runtime::new(clock.clone());
    let stamps = clock.clone();
    let records = pipeline(&clock, Rc::new(catalog), config);
    runtime
        .block_on(
            records
                .map(move |record| (stamps.now().since_start(), record))
                .collect(),
        )
        .unwrap()
}

fn records(catalog: Catalog, config: &Config) -> Vec<Record> {
    timeline(catalog, config)
        .into_iter()
        .map(|(_, record)| record)
        .collect()
}

fn pairs(records: &[Record]) -> Vec<(&str, &str)> {
    records
        .iter()
        .map(|r| (r.user.as_str(), r.option.as_str()))
        .collect()
}

#[test]
fn sequential_reference_output() {
    let out = records(
        Catalog::reference(),
        &Config::with_strategy(Strategy::Sequential),
    );
    assert_eq!(
        pairs(&out),
        vec![
            ("Antonio", "It"),
            ("Antonio", "Tierra"),
            ("Antonio", "22/11/63"),
            ("Patri", "Las Cabrillas"),
            ("Patri", "Cerro Larda"),
            ("Maria", "ColdPlay"),
            ("Maria", "Clásica"),
        ]
    );
    assert!(out.iter().all(|r| r.hobby != "Escalada"));
}

#[test]
fn sequential_keeps_outer_then_inner_order() {
    let catalog = Catalog::reference();
    let out = records(
        catalog.clone(),
        &Config::with_strategy(Strategy::Sequential),
    );

    let users: Vec<_> = out.iter().map(|r| r.user.as_str()).dedup().collect();
    assert_eq!(users, ["Antonio", "Patri", "Maria"]);

    let expected: usize = catalog
        .people
        .iter()
        .map(|p| catalog.options_for(&p.hobby).len())
        .sum();
    assert_eq!(out.len(), expected);
}

#[test]
fn sequential_never_overlaps_inner_streams() {
    let out = timeline(
        Catalog::reference(),
        &Config::with_strategy(Strategy::Sequential),
    );
    let secs: Vec<_> = out.iter().map(|(at, _)| at.as_secs()).collect();
    // Each inner stream starts when the previous one completes.
    assert_eq!(secs, vec![3, 5, 7, 9, 11, 13, 15]);
}

#[test]
fn parallel_emits_the_same_multiset() {
    let sequential = records(
        Catalog::reference(),
        &Config::with_strategy(Strategy::Sequential),
    );
    let parallel = records(
        Catalog::reference(),
        &Config::with_strategy(Strategy::Parallel),
    );

    assert_eq!(
        sequential.iter().counts(),
        parallel.iter().counts(),
        "every (person, option) pair appears exactly once"
    );
    assert_ne!(sequential, parallel);
}

#[test]
fn parallel_keeps_each_persons_order_and_pace() {
    let catalog = Catalog::reference();
    let config = Config::with_strategy(Strategy::Parallel);
    let out = timeline(catalog.clone(), &config);

    let by_user = out
        .iter()
        .map(|(at, r)| (r.user.clone(), (*at, r.option.clone())))
        .into_group_map();

    for person in &catalog.people {
        let options = catalog.options_for(&person.hobby);
        let Some(seen) = by_user.get(&person.name) else {
            assert!(options.is_empty(), "{} is missing", person.name);
            continue;
        };
        let seen_options: Vec<_> = seen.iter().map(|(_, o)| o.as_str()).collect();
        assert_eq!(seen_options, options);

        for ((earlier, _), (later, _)) in seen.iter().tuple_windows() {
            assert!(*later - *earlier >= config.inner_period);
        }
    }
}

#[test]
fn switching_only_keeps_the_last_person() {
    let config = Config::with_strategy(Strategy::Switching);
    assert!(config.outer_period < config.inner_period);

    let out = records(Catalog::reference(), &config);
    assert_eq!(
        pairs(&out),
        vec![("Maria", "ColdPlay"), ("Maria", "Clásica")]
    );
}

#[test]
fn switching_with_fast_inner_streams_loses_nothing() {
    let config = Config {
        inner_period: Duration::from_millis(100),
        ..Config::with_strategy(Strategy::Switching)
    };
    let switching = records(Catalog::reference(), &config);
    let sequential = records(
        Catalog::reference(),
        &Config::with_strategy(Strategy::Sequential),
    );
    assert_eq!(switching, sequential);
}

#[test]
fn switching_does_not_wait_on_an_empty_hobby() {
    let catalog = Catalog::new(
        vec![
            Person::new("Fer", 47, "Escalada"),
            Person::new("Maria", 46, "Musica"),
        ],
        vec![Hobby::new("Musica", ["ColdPlay", "Clásica"])],
    );
    let out = timeline(catalog, &Config::with_strategy(Strategy::Switching));
    let secs: Vec<_> = out.iter().map(|(at, _)| at.as_secs()).collect();
    // Maria arrives at 2s and her options tick two seconds apart from there.
    assert_eq!(secs, vec![4, 6]);
}

#[test]
fn empty_hobby_yields_nothing_under_every_strategy() {
    let catalog = Catalog::new(
        vec![
            Person::new("Fer", 47, "Escalada"),
            Person::new("Nadie", 30, "Ninguna"),
        ],
        vec![Hobby::new("Musica", ["ColdPlay"])],
    );
    for strategy in Strategy::ALL {
        let out = timeline(catalog.clone(), &Config::with_strategy(strategy));
        assert!(out.is_empty(), "{strategy}");
    }
}

#[test]
fn outer_count_bounds_the_people() {
    let config = Config {
        outer_count: 2,
        ..Config::with_strategy(Strategy::Parallel)
    };
    let out = records(Catalog::reference(), &config);
    let users: Vec<_> = out.iter().map(|r| r.user.as_str()).unique().collect();
    assert_eq!(users, ["Antonio", "Patri"]);
    assert_eq!(out.len(), 5);
}

#[test]
fn runs_are_repeatable() {
    for strategy in Strategy::ALL {
        let config = Config::with_strategy(strategy);
        assert_eq!(
            timeline(Catalog::reference(), &config),
            timeline(Catalog::reference(), &config),
            "{strategy}"
        );
    }
}

#[test]
fn visor_prints_json_lines() {
    let mut visor = Visor::new(Vec::new());
    run(
        Catalog::reference(),
        &Config::with_strategy(Strategy::Switching),
        &mut visor,
    )
    .unwrap();

    let out = String::from_utf8(visor.into_inner()).unwrap();
    assert_eq!(
        out,
        concat!(
            r#"{"usuario":"Maria","aficion":"Musica","opcion":"ColdPlay"}"#,
            "\n",
            r#"{"usuario":"Maria","aficion":"Musica","opcion":"Clásica"}"#,
            "\n",
        )
    );
}
