use aeraki_envoyfilter::xds::filters::network::DubboProxy;
use aeraki_envoyfilter::xds::filters::{encode_filter, ProtocolFilter};
use aeraki_envoyfilter::{NetworkFilterPatchGenerator, Port, ServiceDescriptor, WorkloadSelector};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::time::Duration;

const INTERFACE: &str = "org.apache.dubbo.samples.basic.api.DemoService";

fn service(address_count: usize) -> ServiceDescriptor {
    let addresses: Vec<String> =
        (0..address_count).map(|i| format!("240.240.{}.{}", i / 256, i % 256)).collect();
    ServiceDescriptor::new(["dubbo.example.com"], addresses, &[20880])
        .with_workload_selector(WorkloadSelector::new().with_label("app", "dubbo-provider"))
}

fn bench_generate(c: &mut Criterion) {
    let generator = NetworkFilterPatchGenerator::new();
    let outbound = DubboProxy::for_interface("outbound|20880||dubbo", INTERFACE, "outbound|20880||dubbo");
    let inbound = DubboProxy::for_interface("inbound|20880||", INTERFACE, "inbound|20880||");
    let port = Port::new(20880);

    let mut group = c.benchmark_group("patch_generation");
    group.measurement_time(Duration::from_secs(5));

    for count in [1usize, 16, 256].iter() {
        let service = service(*count);
        group.bench_with_input(BenchmarkId::new("replace_default_filter", count), count, |b, _| {
            b.iter(|| {
                generator.replace_default_filter(
                    black_box(&service),
                    &port,
                    Some(&outbound),
                    Some(&inbound),
                    DubboProxy::FILTER_NAME,
                    DubboProxy::TYPE_URL,
                )
            })
        });
    }

    group.finish();
}

fn bench_encode(c: &mut Criterion) {
    let proxy = DubboProxy::for_interface("outbound|20880||dubbo", INTERFACE, "outbound|20880||dubbo");

    c.bench_function("encode_filter/dubbo", |b| {
        b.iter(|| encode_filter(black_box(&proxy), DubboProxy::FILTER_NAME, DubboProxy::TYPE_URL))
    });
}

criterion_group!(benches, bench_generate, bench_encode);
criterion_main!(benches);
