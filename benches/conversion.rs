use criterion::{black_box, criterion_group, criterion_main, Criterion};
use xml2json::converters::convert_document;
use xml2json::serializers::serialize;
use xml2json::{xml_str_to_json, ConverterConfig, Document};

fn catalog(items: usize) -> String {
    let mut xml = String::from("<catalog version=\"2\">");
    for i in 0..items {
        xml.push_str(&format!(
            "<item id=\"{i}\"><name>Item {i}</name><price currency=\"EUR\">{i}.99</price><tag>a</tag><tag>b</tag></item>"
        ));
    }
    xml.push_str("</catalog>");
    xml
}

fn bench_parse(c: &mut Criterion) {
    let input = catalog(1000);

    c.bench_function("parse_catalog", |b| {
        b.iter(|| Document::from_string(black_box(&input)).unwrap())
    });
}

fn bench_convert(c: &mut Criterion) {
    let input = catalog(1000);
    let document = Document::from_string(&input).unwrap();

    c.bench_function("convert_catalog", |b| {
        b.iter(|| convert_document(black_box(document.root())).unwrap())
    });

    let converted = convert_document(document.root()).unwrap();
    c.bench_function("serialize_catalog", |b| {
        b.iter(|| serialize(black_box(&converted)).unwrap())
    });
}

fn bench_end_to_end(c: &mut Criterion) {
    let input = catalog(1000);
    let config = ConverterConfig::default();

    c.bench_function("xml_str_to_json_catalog", |b| {
        b.iter(|| xml_str_to_json(black_box(&input), &config).unwrap())
    });
}

criterion_group!(benches, bench_parse, bench_convert, bench_end_to_end);
criterion_main!(benches);
