use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use roicalc_estimator::{
    calculate, CodeAssistInput, CrmInput, EstimatorConfig, LowCodeInput, M365Input,
    ProductLineInput, SecurityInput,
};

fn full_selection() -> Vec<ProductLineInput> {
    vec![
        ProductLineInput::M365(M365Input {
            employees: Some(250.0),
            emails_per_day: Some(40.0),
            meetings_per_week: Some(8.0),
            documents_per_week: Some(5.0),
            presentations_per_month: Some(2.0),
            hourly_rate: None,
        }),
        ProductLineInput::CodeAssist(CodeAssistInput {
            developers: Some(20.0),
            code_reviews_per_week: Some(5.0),
            bugs_per_month: Some(8.0),
            features_per_month: Some(3.0),
            hourly_rate: Some(75.0),
        }),
        ProductLineInput::LowCode(LowCodeInput {
            business_users: Some(30.0),
            apps_per_month: Some(1.0),
            flows_per_month: Some(4.0),
            reports_per_week: Some(2.0),
            hourly_rate: None,
        }),
        ProductLineInput::Crm(CrmInput {
            sales_reps: Some(15.0),
            leads_per_week: Some(25.0),
            customer_interactions: Some(40.0),
            reports_per_month: Some(4.0),
            hourly_rate: None,
        }),
        ProductLineInput::Security(SecurityInput {
            security_analysts: Some(5.0),
            incidents_per_month: Some(6.0),
            threats_per_week: Some(12.0),
            compliance_checks: Some(3.0),
            hourly_rate: None,
        }),
    ]
}

fn bench_calculate(c: &mut Criterion) {
    let cfg = EstimatorConfig::default();
    let all = full_selection();

    let mut group = c.benchmark_group("calculate");
    for n in 1..=all.len() {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &all[..n], |b, inputs| {
            b.iter(|| calculate(black_box(inputs), black_box(Some(55.0)), &cfg).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_calculate);
criterion_main!(benches);
