//! Degrees-of-freedom check.

use wt_flowsheet::Flowsheet;

use crate::error::{SolverError, SolverResult};

/// Hard stop unless the flowsheet has exactly zero degrees of freedom.
///
/// Run before any solve attempt; an under-specified model has no unique
/// solution and an over-specified one is caught at the block level.
pub fn check_dof(fs: &Flowsheet) -> SolverResult<()> {
    let dof = fs.degrees_of_freedom();
    if dof != 0 {
        return Err(SolverError::UnderSpecified { dof });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wt_components::Splitter;

    #[test]
    fn free_split_fraction_fails_the_check() {
        let mut fs = Flowsheet::new();
        fs.splitter = Some(Splitter::new("splitter", &["pretreatment", "bypass"]).unwrap());
        let err = check_dof(&fs).unwrap_err();
        assert!(matches!(err, SolverError::UnderSpecified { dof: 1 }));
    }

    #[test]
    fn fixed_split_fraction_passes() {
        let mut fs = Flowsheet::new();
        let mut sp = Splitter::new("splitter", &["pretreatment", "bypass"]).unwrap();
        sp.fix_split_fraction("bypass", 0.1).unwrap();
        fs.splitter = Some(sp);
        assert!(check_dof(&fs).is_ok());
    }
}
