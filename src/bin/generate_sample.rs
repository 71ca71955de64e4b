//! Write synthetic workbooks in the layout of the OECD downloads, at the
//! paths the default settings read from.

use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::Workbook;

use tax_wedge::config::{IncomeChartConfig, Settings, TaxpayerChartConfig};

const COUNTRIES: [&str; 38] = [
    "Australia", "Austria", "Belgium", "Canada", "Chile", "Colombia", "Costa Rica",
    "Czechia", "Denmark", "Estonia", "Finland", "France", "Germany", "Greece", "Hungary",
    "Iceland", "Ireland", "Israel", "Italy", "Japan", "Korea", "Latvia", "Lithuania",
    "Luxembourg", "Mexico", "Netherlands", "New Zealand", "Norway", "Poland", "Portugal",
    "Slovak Republic", "Slovenia", "Spain", "Sweden", "Switzerland", "Türkiye",
    "United Kingdom", "United States",
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

/// One sheet: a header row, then a country per row with three tax wedges.
fn write_taxpayer_workbook(config: &TaxpayerChartConfig, rng: &mut SimpleRng) -> Result<()> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(&config.sheet)?;

    let header = [
        "Country",
        "Single worker, no children",
        "One-earner married couple, 2 children",
        "Two-earner married couple, 2 children",
    ];
    for (col, text) in header.iter().enumerate() {
        sheet.write_string(config.header_row, col as u16, *text)?;
    }

    let mut row = config.header_row + 1;
    for (i, country) in COUNTRIES.iter().enumerate() {
        let single = rng.uniform(0.10, 0.52);
        let one_earner = (single - rng.uniform(0.03, 0.15)).max(0.0);
        let two_earner = (single - rng.uniform(0.0, 0.08)).max(0.0);
        sheet.write_string(row, 0, *country)?;
        sheet.write_number(row, 1, single)?;
        // a gap now and then, as in the published table
        if i % 17 != 5 {
            sheet.write_number(row, 2, one_earner)?;
        }
        sheet.write_number(row, 3, two_earner)?;
        row += 1;
    }
    sheet.write_string(row + 1, 0, "Note: synthetic data for testing the chart pipeline.")?;

    save(&mut workbook, &config.workbook)
}

/// One sheet per household: title rows, a header row, then one row per
/// income level with a tax wedge per country.
fn write_income_workbook(config: &IncomeChartConfig, rng: &mut SimpleRng) -> Result<()> {
    let mut workbook = Workbook::new();
    let first_col: u16 = 1;
    let levels: Vec<u32> = (50..=250).step_by(5).collect();
    let base: Vec<f64> = COUNTRIES.iter().map(|_| rng.uniform(10.0, 45.0)).collect();
    let slope: Vec<f64> = COUNTRIES.iter().map(|_| rng.uniform(4.0, 16.0)).collect();

    for (s, name) in config.sheets.iter().enumerate() {
        let sheet = workbook.add_worksheet();
        sheet.set_name(name)?;
        sheet.write_string(0, first_col, format!("Tax wedge, {name} (synthetic)"))?;
        sheet.write_string(2, first_col, "Income level")?;

        let header_row = config.header_row;
        sheet.write_string(header_row, first_col, "Income level")?;
        for (c, country) in COUNTRIES.iter().enumerate() {
            sheet.write_string(header_row, first_col + 1 + c as u16, *country)?;
        }

        let offset = -4.0 * s as f64;
        for (r, level) in levels.iter().enumerate() {
            let row = header_row + 1 + r as u32;
            sheet.write_string(row, first_col, format!("{level}{}", config.index_suffix))?;
            for c in 0..COUNTRIES.len() {
                if (r + c + s) % 23 == 7 {
                    continue;
                }
                let x = *level as f64 / 100.0;
                let wedge = base[c] + slope[c] * x.ln() + offset + rng.uniform(-0.5, 0.5);
                sheet.write_number(row, first_col + 1 + c as u16, wedge.max(0.0))?;
            }
        }
    }

    save(&mut workbook, &config.workbook)
}

fn save(workbook: &mut Workbook, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating {}", dir.display()))?;
    }
    workbook
        .save(path)
        .with_context(|| format!("writing {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn main() -> Result<()> {
    let settings = Settings::default();
    let mut rng = SimpleRng::new(42);
    write_taxpayer_workbook(&settings.taxpayer, &mut rng)?;
    write_income_workbook(&settings.income, &mut rng)?;
    Ok(())
}
