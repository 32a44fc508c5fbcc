use super::accumulate::LdCells;
use std::io::{self, Write};

/// one row of the per-slice report. Chromosome/trait/marker identity and
/// the liability-class summary statistics (`COUNT`, `MAX_HLOD`, DGF,
/// penetrances, optional standard deviations and threshold) are not
/// produced by the integrator itself — positional/marker bookkeeping is
/// out of scope for this crate — so callers supply them alongside the
/// [`super::SliceResult`] they came from.
#[derive(Debug, Clone)]
pub struct SliceRow<'a> {
    pub chr: &'a str,
    pub trait_name: &'a str,
    pub marker: &'a str,
    pub theta: f64,
    pub count: usize,
    pub bayes_ratio: f64,
    pub err_est: f64,
    pub max_hlod: f64,
    pub alpha: f64,
    pub dgf: f64,
    pub penetrance: [f64; 3],
    pub penetrance_sd: Option<[f64; 3]>,
    pub threshold: Option<f64>,
}

/// writes the per-slice table: `Chr, Trait, Marker, θ, COUNT, BR, ERR_EST,
/// MAX_HLOD, α, DGF, PEN_DD, PEN_Dd, PEN_dd [, SD_DD, SD_Dd, SD_dd]
/// [, threshold]`, column layout matching the reference driver's `PPL`
/// file. The optional SD/threshold columns only appear when at least one
/// row carries them, mirroring the source's conditional `fprintf` header.
pub fn write_slice_table<'a, W: Write>(rows: impl IntoIterator<Item = &'a SliceRow<'a>>, mut out: W) -> io::Result<()> {
    let rows: Vec<&SliceRow> = rows.into_iter().collect();
    let with_sd = rows.iter().any(|r| r.penetrance_sd.is_some());
    let with_threshold = rows.iter().any(|r| r.threshold.is_some());

    write!(
        out,
        "{:>4} {:>10} {:>10} {:>8} {:>8} {:>14} {:>10} {:>10} {:>8} {:>8} {:>8} {:>8} {:>8}",
        "Chr", "Trait", "Marker", "Theta", "COUNT", "BR", "ERR_EST", "MAX_HLOD", "Alpha", "DGF", "PEN_DD", "PEN_Dd", "PEN_dd"
    )?;
    if with_sd {
        write!(out, " {:>8} {:>8} {:>8}", "SD_DD", "SD_Dd", "SD_dd")?;
    }
    if with_threshold {
        write!(out, " {:>10}", "threshold")?;
    }
    writeln!(out)?;

    for r in rows {
        write!(
            out,
            "{:>4} {:>10} {:>10} {:>8.4} {:>8} {:>14.6e} {:>10.3e} {:>10.4} {:>8.4} {:>8.4} {:>8.4} {:>8.4} {:>8.4}",
            r.chr,
            r.trait_name,
            r.marker,
            r.theta,
            r.count,
            r.bayes_ratio,
            r.err_est,
            r.max_hlod,
            r.alpha,
            r.dgf,
            r.penetrance[0],
            r.penetrance[1],
            r.penetrance[2],
        )?;
        if with_sd {
            let sd = r.penetrance_sd.unwrap_or([0.0; 3]);
            write!(out, " {:>8.4} {:>8.4} {:>8.4}", sd[0], sd[1], sd[2])?;
        }
        if with_threshold {
            write!(out, " {:>10.4}", r.threshold.unwrap_or(0.0))?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// one row of the summary report: one per marker, after every slice at
/// that marker has been scanned and folded through [`super::BayesDriver::summarize`].
#[derive(Debug, Clone)]
pub struct SummaryRow<'a> {
    pub chr: &'a str,
    pub marker: &'a str,
    pub cm: f64,
    pub ppl: f64,
    pub ld_ppl: Option<f64>,
    pub ppld: Option<f64>,
    pub mod_score: f64,
    pub alpha: f64,
    pub dgf: f64,
    pub penetrance: Vec<f64>,
}

/// writes the summary table: `CHR, MARKER, cM, PPL [, LD-PPL, PPLD], MOD,
/// α, DGF, penetrances…`. The LD-PPL/PPLD columns only appear when at
/// least one row carries them (i.e. the scan included any LD slices).
pub fn write_summary_table<'a, W: Write>(rows: impl IntoIterator<Item = &'a SummaryRow<'a>>, mut out: W) -> io::Result<()> {
    let rows: Vec<&SummaryRow> = rows.into_iter().collect();
    let with_ld = rows.iter().any(|r| r.ld_ppl.is_some() || r.ppld.is_some());

    write!(out, "{:>4} {:>10} {:>8} {:>8}", "CHR", "MARKER", "cM", "PPL")?;
    if with_ld {
        write!(out, " {:>8} {:>8}", "LD-PPL", "PPLD")?;
    }
    write!(out, " {:>10} {:>8} {:>8}", "MOD", "Alpha", "DGF")?;
    for i in 0..rows.first().map(|r| r.penetrance.len()).unwrap_or(0) {
        write!(out, " {:>8}", format!("PEN_{i}"))?;
    }
    writeln!(out)?;

    for r in rows {
        write!(out, "{:>4} {:>10} {:>8.4} {:>8.6}", r.chr, r.marker, r.cm, r.ppl)?;
        if with_ld {
            write!(out, " {:>8.6} {:>8.6}", r.ld_ppl.unwrap_or(0.0), r.ppld.unwrap_or(0.0))?;
        }
        write!(out, " {:>10.4} {:>8.4} {:>8.4}", r.mod_score, r.alpha, r.dgf)?;
        for p in &r.penetrance {
            write!(out, " {:>8.4}", p)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// writes the six-region diagnostic file: the six accumulated masses (LD
/// small-θ, LD big-θ, LD unlinked, LE small-θ, LE big-θ, LE unlinked) for
/// one marker, one row per marker passed in.
pub fn write_six_region_diagnostic<'a, W: Write>(rows: impl IntoIterator<Item = (&'a str, &'a LdCells)>, mut out: W) -> io::Result<()> {
    writeln!(
        out,
        "{:>10} {:>14} {:>14} {:>14} {:>14} {:>14} {:>14}",
        "Marker", "LD_small", "LD_big", "LD_unlinked", "LE_small", "LE_big", "LE_unlinked"
    )?;
    for (marker, cells) in rows {
        writeln!(
            out,
            "{:>10} {:>14.6e} {:>14.6e} {:>14.6e} {:>14.6e} {:>14.6e} {:>14.6e}",
            marker, cells.ld_small_theta, cells.ld_big_theta, cells.ld_unlinked, cells.le_small_theta, cells.le_big_theta, cells.le_unlinked
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_table_omits_optional_columns_when_absent() {
        let rows = vec![SliceRow {
            chr: "1",
            trait_name: "DISEASE",
            marker: "M1",
            theta: 0.0,
            count: 3,
            bayes_ratio: 2.0,
            err_est: 1e-6,
            max_hlod: 0.5,
            alpha: 0.3,
            dgf: 0.1,
            penetrance: [0.9, 0.5, 0.1],
            penetrance_sd: None,
            threshold: None,
        }];
        let mut buf = Vec::new();
        write_slice_table(rows.iter(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(!text.contains("SD_DD"));
        assert!(!text.contains("threshold"));
    }

    #[test]
    fn slice_table_includes_sd_and_threshold_when_present() {
        let rows = vec![SliceRow {
            chr: "1",
            trait_name: "DISEASE",
            marker: "M1",
            theta: 0.0,
            count: 3,
            bayes_ratio: 2.0,
            err_est: 1e-6,
            max_hlod: 0.5,
            alpha: 0.3,
            dgf: 0.1,
            penetrance: [0.9, 0.5, 0.1],
            penetrance_sd: Some([0.05, 0.05, 0.05]),
            threshold: Some(20.0),
        }];
        let mut buf = Vec::new();
        write_slice_table(rows.iter(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("SD_DD"));
        assert!(text.contains("threshold"));
    }

    #[test]
    fn summary_table_includes_ld_columns_only_when_present() {
        let rows = vec![SummaryRow {
            chr: "1",
            marker: "M1",
            cm: 12.5,
            ppl: 0.2,
            ld_ppl: None,
            ppld: None,
            mod_score: 1.1,
            alpha: 0.4,
            dgf: 0.1,
            penetrance: vec![0.9, 0.5, 0.1],
        }];
        let mut buf = Vec::new();
        write_summary_table(rows.iter(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(!text.contains("LD-PPL"));

        let rows_with_ld = vec![SummaryRow { ld_ppl: Some(0.1), ppld: Some(0.05), ..rows[0].clone() }];
        let mut buf = Vec::new();
        write_summary_table(rows_with_ld.iter(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("LD-PPL"));
    }

    #[test]
    fn six_region_diagnostic_writes_one_row_per_marker() {
        let mut cells = LdCells::new();
        cells.accumulate(0.0, None, 10.0, 0.05);
        cells.accumulate(0.5, None, 1.0, 0.05);
        let mut buf = Vec::new();
        write_six_region_diagnostic([("M1", &cells)], &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 2);
    }
}
