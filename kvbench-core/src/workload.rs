//! Standard Workloads
//!
//! The canonical key-value cases run against any [`Database`]. Payloads are generated
//! once, deterministically from a seed, so every backend sees the same records.

use crate::case::CaseSpec;
use crate::database::{AccessMode, Capabilities, Database};
use crate::error::{BenchError, StoreError};
use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Field every generated record carries for the index case
pub const GROUP_FIELD: &str = "group";

/// Distinct values of [`GROUP_FIELD`]
pub const GROUP_COUNT: u64 = 10;

/// Shape of generated record values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PayloadShape {
    /// Many short top-level string fields
    #[default]
    Flat,
    /// A nested object with an array
    Nested,
    /// A single large string
    Blob,
}

impl FromStr for PayloadShape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "flat" => Ok(PayloadShape::Flat),
            "nested" => Ok(PayloadShape::Nested),
            "blob" => Ok(PayloadShape::Blob),
            _ => Err(format!("Unknown payload shape: {}", s)),
        }
    }
}

impl fmt::Display for PayloadShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PayloadShape::Flat => "flat",
            PayloadShape::Nested => "nested",
            PayloadShape::Blob => "blob",
        })
    }
}

/// Parameters of the standard workload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkloadConfig {
    /// Size of the key space the cases cycle over
    pub records: u64,
    /// Records written before measuring the read cases
    pub prefill: u64,
    /// Number of stores every write fans out to
    pub stores: usize,
    /// Value shape
    pub payload: PayloadShape,
    /// Approximate payload size in bytes
    pub payload_size: usize,
    /// Records per bulk call
    pub batch_size: usize,
    /// RNG seed for payload generation
    pub seed: u64,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            records: 1000,
            prefill: 1000,
            stores: 1,
            payload: PayloadShape::Flat,
            payload_size: 128,
            batch_size: 100,
            seed: 42,
        }
    }
}

impl WorkloadConfig {
    /// Reject parameters no case can run with
    pub fn validate(&self) -> Result<(), BenchError> {
        if self.records == 0 {
            return Err(BenchError::Configuration("records must be at least 1".into()));
        }
        if self.stores == 0 {
            return Err(BenchError::Configuration("stores must be at least 1".into()));
        }
        if self.batch_size == 0 {
            return Err(BenchError::Configuration("batch_size must be at least 1".into()));
        }
        Ok(())
    }

    /// Logical operations per bulk call
    pub fn bulk_factor(&self) -> Result<u32, BenchError> {
        self.batch_size
            .checked_mul(self.stores)
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| BenchError::Configuration("batch_size × stores overflows".into()))
    }
}

/// Generate one record value
pub fn generate_payload(rng: &mut impl Rng, id: u64, shape: PayloadShape, size: usize) -> Value {
    let group = id % GROUP_COUNT;
    match shape {
        PayloadShape::Flat => {
            let mut record = serde_json::Map::new();
            record.insert("id".into(), json!(id));
            record.insert(GROUP_FIELD.into(), json!(group));
            for field in 0..(size / 8).max(1) {
                record.insert(format!("f{field}"), json!(alphanumeric(rng, 8)));
            }
            Value::Object(record)
        }
        PayloadShape::Nested => {
            let chunk = (size / 4).max(1);
            json!({
                "id": id,
                GROUP_FIELD: group,
                "profile": {
                    "name": alphanumeric(rng, chunk),
                    "address": { "city": alphanumeric(rng, chunk) },
                    "tags": [alphanumeric(rng, chunk / 2 + 1), alphanumeric(rng, chunk / 2 + 1)],
                    "score": rng.gen_range(0..1000),
                },
            })
        }
        PayloadShape::Blob => json!({
            "id": id,
            GROUP_FIELD: group,
            "data": alphanumeric(rng, size),
        }),
    }
}

fn alphanumeric(rng: &mut impl Rng, len: usize) -> String {
    rng.sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

struct Batch {
    keys: Vec<String>,
    values: Vec<Value>,
}

/// Slot indices of `size`-long batches covering `0..span`. The last batch wraps back to
/// slot 0, so every batch holds exactly `size` slots even when `size > span`.
fn wrapped_batches(span: u64, size: usize) -> impl Iterator<Item = Vec<usize>> {
    let size = size as u64;
    (0..span.div_ceil(size)).map(move |batch| {
        (0..size)
            .map(|j| ((batch * size + j) % span) as usize)
            .collect()
    })
}

/// Pre-generated stores, keys, values and bulk batches
struct Fixture {
    stores: Vec<String>,
    keys: Vec<String>,
    values: Vec<Value>,
    write_batches: Vec<Batch>,
    /// Key batches drawn only from the prefilled range
    read_batches: Vec<Vec<String>>,
    readable: u64,
}

impl Fixture {
    fn generate(config: &WorkloadConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let stores = (0..config.stores).map(|n| format!("store_{n}")).collect();
        let keys: Vec<String> = (0..config.records).map(|i| format!("key-{i:08}")).collect();
        let values: Vec<Value> = (0..config.records)
            .map(|i| generate_payload(&mut rng, i, config.payload, config.payload_size))
            .collect();
        let readable = config.prefill.min(config.records).max(1);

        let write_batches: Vec<Batch> = wrapped_batches(config.records, config.batch_size)
            .map(|slots| Batch {
                keys: slots.iter().map(|&s| keys[s].clone()).collect(),
                values: slots.iter().map(|&s| values[s].clone()).collect(),
            })
            .collect();
        let read_batches: Vec<Vec<String>> = wrapped_batches(readable, config.batch_size)
            .map(|slots| slots.iter().map(|&s| keys[s].clone()).collect())
            .collect();

        Self {
            stores,
            keys,
            values,
            write_batches,
            read_batches,
            readable,
        }
    }

    fn record(&self, i: u64) -> (&str, &Value) {
        let slot = (i % self.keys.len() as u64) as usize;
        (&self.keys[slot], &self.values[slot])
    }

    fn store(&self, i: u64) -> &str {
        &self.stores[(i % self.stores.len() as u64) as usize]
    }

    fn write_batch(&self, i: u64) -> &Batch {
        &self.write_batches[(i % self.write_batches.len() as u64) as usize]
    }

    fn read_batch(&self, i: u64) -> &[String] {
        &self.read_batches[(i % self.read_batches.len() as u64) as usize]
    }
}

#[derive(Clone)]
struct Workload {
    db: Arc<dyn Database>,
    fixture: Arc<Fixture>,
}

impl Workload {
    fn indexed<F, Fut>(&self, f: F) -> impl Fn(u64) -> Fut + Send + Sync + 'static + use<F, Fut>
    where
        F: Fn(Workload, u64) -> Fut + Send + Sync + 'static,
    {
        let workload = self.clone();
        move |i| f(workload.clone(), i)
    }

    fn named<F, Fut>(&self, f: F) -> impl Fn(String) -> Fut + Send + Sync + 'static + use<F, Fut>
    where
        F: Fn(Workload) -> Fut + Send + Sync + 'static,
    {
        let workload = self.clone();
        move |_| f(workload.clone())
    }

    fn spec(&self, prefill: u64) -> CaseSpec {
        let spec = CaseSpec::new()
            .before(self.named(provision))
            .after(self.named(teardown));
        if prefill > 0 {
            spec.pre_measure(prefill, self.indexed(write_everywhere))
        } else {
            spec
        }
    }
}

async fn provision(w: Workload) -> Result<(), StoreError> {
    w.db.clear().await?;
    w.db.create_stores(&w.fixture.stores).await
}

async fn provision_indexed(w: Workload) -> Result<(), StoreError> {
    provision(w.clone()).await?;
    for store in &w.fixture.stores {
        w.db.create_index(store, GROUP_FIELD).await?;
    }
    Ok(())
}

async fn teardown(w: Workload) -> Result<(), StoreError> {
    w.db.clear().await
}

async fn write_everywhere(w: Workload, i: u64) -> Result<(), StoreError> {
    let (key, value) = w.fixture.record(i);
    for store in &w.fixture.stores {
        w.db.set(store, key, value.clone()).await?;
    }
    Ok(())
}

async fn put(w: Workload, i: u64) -> Result<(), StoreError> {
    let (key, value) = w.fixture.record(i);
    w.db.set(w.fixture.store(i), key, value.clone()).await
}

async fn get(w: Workload, i: u64) -> Result<(), StoreError> {
    let (key, _) = w.fixture.record(i % w.fixture.readable);
    w.db
        .get(w.fixture.store(i), key, AccessMode::ReadOnly)
        .await
        .map(drop)
}

async fn bulk_put(w: Workload, i: u64) -> Result<(), StoreError> {
    let batch = w.fixture.write_batch(i);
    w.db
        .bulk_set(&w.fixture.stores, &batch.keys, &batch.values)
        .await
}

async fn bulk_get(w: Workload, i: u64) -> Result<(), StoreError> {
    w.db
        .bulk_get(&w.fixture.stores, w.fixture.read_batch(i), AccessMode::ReadOnly)
        .await
        .map(drop)
}

async fn get_all(w: Workload, _i: u64) -> Result<(), StoreError> {
    w.db
        .get_all(w.fixture.store(0), AccessMode::ReadOnly)
        .await
        .map(drop)
}

async fn get_by_index(w: Workload, i: u64) -> Result<(), StoreError> {
    w.db
        .get_all_by_index(
            w.fixture.store(i),
            GROUP_FIELD,
            &json!(i % GROUP_COUNT),
            AccessMode::ReadOnly,
        )
        .await
        .map(drop)
}

/// Build the standard cases in run order: put, get, bulk put, bulk get, get all,
/// get by index.
pub fn standard_cases(
    db: Arc<dyn Database>,
    config: &WorkloadConfig,
) -> Result<Vec<(String, CaseSpec)>, BenchError> {
    config.validate()?;
    let bulk_factor = config.bulk_factor()?;
    let workload = Workload {
        db,
        fixture: Arc::new(Fixture::generate(config)),
    };
    let prefill = config.prefill;

    Ok(vec![
        ("put".to_string(), workload.spec(0).measure(workload.indexed(put))),
        ("get".to_string(), workload.spec(prefill).measure(workload.indexed(get))),
        (
            "bulk put".to_string(),
            workload
                .spec(0)
                .bulk_factor(bulk_factor)
                .requires(Capabilities::BULK_SET)
                .measure(workload.indexed(bulk_put)),
        ),
        (
            "bulk get".to_string(),
            workload
                .spec(prefill)
                .bulk_factor(bulk_factor)
                .requires(Capabilities::BULK_GET)
                .measure(workload.indexed(bulk_get)),
        ),
        (
            "get all".to_string(),
            workload
                .spec(prefill)
                .requires(Capabilities::GET_ALL)
                .measure(workload.indexed(get_all)),
        ),
        (
            "get by index".to_string(),
            workload
                .spec(prefill)
                .before(workload.named(provision_indexed))
                .requires(Capabilities::INDEX)
                .measure(workload.indexed(get_by_index)),
        ),
    ])
}
