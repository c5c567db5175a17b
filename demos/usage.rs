use chain_hash::HashMap;
use chain_hash::StringHash;
use clap::Parser;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'c', long = "capacity", default_value_t = 16)]
    capacity: usize,

    #[arg(short = 'l', long = "load_factor", default_value_t = 0.75)]
    load_factor: f64,

    #[arg(short = 'n', long = "count", default_value_t = 1000)]
    count: usize,
}

fn main() -> Result<(), chain_hash::Error> {
    env_logger::init();
    let args = Args::parse();

    let mut map = HashMap::with_config(args.capacity, args.load_factor, StringHash)?;
    map.set("name".to_string(), "John".to_string())?
        .set("age".to_string(), "25".to_string())?;

    println!("name = {:?}", map.get(&"name".to_string())?);
    println!("has age: {}", map.has(&"age".to_string())?);
    println!("removed age = {:?}", map.remove(&"age".to_string())?);
    println!("entries: {:?}", map.entries());

    println!(
        "Filling map with {} keys starting at capacity {}...",
        args.count,
        map.capacity()
    );
    for i in 0..args.count {
        map.set(format!("key_{i}"), i.to_string())?;
    }

    println!("Length: {}", map.len());
    println!("Capacity: {}", map.capacity());
    println!(
        "Final load factor: {:.2}%",
        (map.len() as f64 / map.capacity() as f64) * 100.0
    );

    let chains = map.chain_lengths();
    let longest = chains.iter().copied().max().unwrap_or(0);
    let mut histogram = vec![0usize; longest + 1];
    for len in chains {
        histogram[len] += 1;
    }
    println!("Chain length histogram:");
    for (len, buckets) in histogram.iter().enumerate() {
        println!("  {len:>3}: {buckets}");
    }

    Ok(())
}
