use std::collections::BTreeMap;

use chain_hash::BucketIndex;
use chain_hash::Error;
use chain_hash::HashMap;
use chain_hash::StringHash;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;

fn random_keys(rng: &mut SmallRng, count: usize) -> Vec<String> {
    (0..count)
        .map(|_| {
            let len = rng.random_range(1..12);
            (0..len)
                .map(|_| rng.random_range(b'a'..=b'z') as char)
                .collect()
        })
        .collect()
}

#[test]
fn usage_scenario() {
    #[derive(Debug, PartialEq)]
    enum Value {
        Text(&'static str),
        Number(i64),
    }

    let mut map = HashMap::with_config(16, 0.75, StringHash).unwrap();
    map.set("name", Value::Text("John"))
        .unwrap()
        .set("age", Value::Number(25))
        .unwrap();

    assert_eq!(map.get(&"name").unwrap(), Some(&Value::Text("John")));
    assert!(map.has(&"age").unwrap());
    assert_eq!(map.remove(&"age").unwrap(), Some(Value::Number(25)));
    assert_eq!(map.len(), 1);
    assert_eq!(map.keys(), vec![&"name"]);
    assert_eq!(map.values(), vec![&Value::Text("John")]);
    assert_eq!(map.entries(), vec![(&"name", &Value::Text("John"))]);
}

#[test]
fn three_keys_in_two_buckets_resize_once() {
    let mut map = HashMap::with_config(2, 0.75, StringHash).unwrap();
    for (i, key) in ["alpha", "beta", "gamma"].into_iter().enumerate() {
        map.set(key, i).unwrap();
    }
    assert_eq!(map.capacity(), 4);
    assert_eq!(map.get(&"alpha").unwrap(), Some(&0));
    assert_eq!(map.get(&"beta").unwrap(), Some(&1));
    assert_eq!(map.get(&"gamma").unwrap(), Some(&2));
}

#[test]
fn out_of_range_index_fails_every_operation() {
    let broken = |_: &String, capacity: usize| capacity;
    let mut map = HashMap::with_hasher(broken);

    let expected = Error::OutOfBounds {
        index: 16,
        capacity: 16,
    };
    assert_eq!(map.set("k".to_string(), 1).unwrap_err(), expected);
    assert_eq!(map.insert("k".to_string(), 1).unwrap_err(), expected);
    assert_eq!(map.get(&"k".to_string()).unwrap_err(), expected);
    assert_eq!(map.has(&"k".to_string()).unwrap_err(), expected);
    assert_eq!(map.remove(&"k".to_string()).unwrap_err(), expected);
    assert_eq!(map.len(), 0);
    assert_eq!(map.capacity(), 16);
}

#[test]
fn matches_reference_map_under_random_operations() {
    let mut rng = SmallRng::seed_from_u64(0x5eed);
    let keys = random_keys(&mut rng, 64);

    let mut map = HashMap::with_config(1, 0.75, StringHash).unwrap();
    let mut reference = BTreeMap::new();

    for step in 0..5000u32 {
        let key = &keys[rng.random_range(0..keys.len())];
        match rng.random_range(0..4) {
            0 | 1 => {
                let previous = map.insert(key.clone(), step).unwrap();
                assert_eq!(previous, reference.insert(key.clone(), step));
            }
            2 => {
                assert_eq!(map.remove(key).unwrap(), reference.remove(key));
            }
            _ => {
                assert_eq!(map.get(key).unwrap(), reference.get(key));
                assert_eq!(map.has(key).unwrap(), reference.contains_key(key));
            }
        }

        assert_eq!(map.len(), reference.len());
        assert!(map.len() as f64 <= map.load_factor() * map.capacity() as f64);
    }

    let mut entries: Vec<(String, u32)> = map
        .entries()
        .into_iter()
        .map(|(k, v)| (k.clone(), *v))
        .collect();
    entries.sort();
    let expected: Vec<(String, u32)> = reference.into_iter().collect();
    assert_eq!(entries, expected);
}

#[test]
fn growth_keeps_every_entry() {
    let mut rng = SmallRng::seed_from_u64(7);
    let mut keys = random_keys(&mut rng, 2000);
    keys.sort();
    keys.dedup();

    let mut map = HashMap::with_config(1, 0.75, StringHash).unwrap();
    let mut capacities = vec![map.capacity()];
    for (i, key) in keys.iter().enumerate() {
        map.set(key.clone(), i).unwrap();
        if *capacities.last().unwrap() != map.capacity() {
            capacities.push(map.capacity());
        }
    }

    assert_eq!(map.len(), keys.len());
    for pair in capacities.windows(2) {
        assert_eq!(pair[1], pair[0] * 2);
    }
    for (i, key) in keys.iter().enumerate() {
        assert_eq!(map.get(key).unwrap(), Some(&i));
    }
    assert_eq!(map.keys().len(), keys.len());
    assert_eq!(map.values().len(), keys.len());
}

#[test]
fn traversal_follows_bucket_then_insertion_order() {
    let mut map = HashMap::with_config(64, 0.75, StringHash).unwrap();
    let words = ["delta", "alpha", "echo", "bravo", "charlie", "foxtrot"];
    for word in words {
        map.set(word, word.len()).unwrap();
    }

    let mut expected: Vec<(usize, usize, &str)> = words
        .iter()
        .enumerate()
        .map(|(order, word)| (StringHash.index(*word, 64), order, *word))
        .collect();
    expected.sort();
    let expected: Vec<&str> = expected.into_iter().map(|(_, _, w)| w).collect();

    let keys: Vec<&str> = map.keys().into_iter().copied().collect();
    assert_eq!(keys, expected);

    let entries = map.entries();
    let keys = map.keys();
    let values = map.values();
    for (i, (k, v)) in entries.into_iter().enumerate() {
        assert_eq!(keys[i], k);
        assert_eq!(values[i], v);
    }
}

#[test]
fn clear_keeps_grown_capacity() {
    let mut map = HashMap::with_config(2, 0.75, StringHash).unwrap();
    for key in ["a", "b", "c", "d", "e", "f"] {
        map.set(key, ()).unwrap();
    }
    let capacity = map.capacity();
    assert!(capacity > 2);

    map.clear();
    assert_eq!(map.len(), 0);
    assert_eq!(map.capacity(), capacity);
    for key in ["a", "b", "c", "d", "e", "f"] {
        assert_eq!(map.get(&key).unwrap(), None);
        assert!(!map.has(&key).unwrap());
    }
}

#[test]
fn each_resize_doubles_exactly_once() {
    let mut map = HashMap::with_config(16, 0.01, StringHash).unwrap();
    map.set("a", 1).unwrap();
    assert_eq!(map.capacity(), 32);
    map.set("b", 2).unwrap();
    assert_eq!(map.capacity(), 64);

    let mut map = HashMap::with_config(16, 1e-30, StringHash).unwrap();
    map.set("a", 1).unwrap();
    assert_eq!(map.capacity(), 32);
    assert_eq!(map.get(&"a").unwrap(), Some(&1));
}

#[test]
fn minimum_hash_key_round_trips() {
    let key = "polygenelubricants";
    let mut map = HashMap::with_config(17, 0.75, StringHash).unwrap();
    map.set(key, "min").unwrap().set("name", "John").unwrap();

    assert_eq!(map.chain_lengths()[2_147_483_648usize % 17], 1);
    assert_eq!(map.get(&key).unwrap(), Some(&"min"));
    assert!(map.has(&key).unwrap());
    assert_eq!(map.remove(&key).unwrap(), Some("min"));
    assert_eq!(map.get(&key).unwrap(), None);
}
