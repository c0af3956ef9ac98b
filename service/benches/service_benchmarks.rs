//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Benchmarks for the session transport

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use telwire_protocol::{Session, SessionListener};
use telwire_service::{ConnectionConfig, SessionStarter};
use tokio::io::{AsyncReadExt, AsyncWriteExt, duplex};
use tokio::runtime::Runtime;

struct Echo;

impl SessionListener for Echo {
    fn incoming_data(&mut self, data: &[u8], session: &mut Session) {
        session.write(data);
    }
}

fn bench_config_creation(c: &mut Criterion) {
    let mut group = c.benchmark_group("config_creation");

    group.bench_function("connection_config_server", |b| {
        b.iter(|| black_box(ConnectionConfig::server()))
    });

    group.finish();
}

fn bench_echo_round_trip(c: &mut Criterion) {
    let runtime = Runtime::new().unwrap();
    let mut group = c.benchmark_group("echo_round_trip");

    for size in [64usize, 4096] {
        let payload = vec![b'x'; size];
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_function(format!("server_{size}"), |b| {
            b.to_async(&runtime).iter(|| async {
                let (local, mut remote) = duplex(8192);
                let (_handle, task) = SessionStarter::server().start(local, Echo);
                remote.write_all(&payload).await.unwrap();
                let mut echoed = vec![0; payload.len()];
                remote.read_exact(&mut echoed).await.unwrap();
                drop(remote);
                task.await.unwrap().unwrap();
                echoed
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_config_creation, bench_echo_round_trip);
criterion_main!(benches);
