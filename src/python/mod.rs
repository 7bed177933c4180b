use numpy::{IntoPyArray, PyArray1};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pythonize::{depythonize, pythonize};
use serde::Serialize;

use sludgecalc_components::{LandArea, SpreadingBiomass};
use sludgecalc_core::calculator::{CalculatorMode, MassBalance};
use sludgecalc_core::config::Scenario;
use sludgecalc_core::errors::SludgeError;
use sludgecalc_core::numeric::FloatValue;
use sludgecalc_core::parameters::{ParameterGroup, ParameterSnapshot, DEFAULT_TARGET_BIOMASS};
use sludgecalc_core::store::ParameterStore;
use sludgecalc_core::sweep::{sweep_default, SweepPoint, SweepVariable};

type PointArrays<'py> = (Bound<'py, PyArray1<FloatValue>>, Bound<'py, PyArray1<FloatValue>>);

fn to_py_err(err: SludgeError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

fn to_dict<'py, T: Serialize>(py: Python<'py>, value: &T) -> PyResult<Bound<'py, PyAny>> {
    Ok(pythonize(py, value)?)
}

/// Parameters from a (possibly partial) nested dict, defaults otherwise
fn snapshot_from(parameters: Option<Bound<'_, PyAny>>) -> PyResult<ParameterSnapshot> {
    match parameters {
        Some(parameters) => depythonize::<ParameterSnapshot>(&parameters)
            .map_err(|e| PyValueError::new_err(format!("{}", e))),
        None => Ok(ParameterSnapshot::default()),
    }
}

fn points_to_arrays<'py>(
    py: Python<'py>,
    points: impl Iterator<Item = SweepPoint>,
) -> PointArrays<'py> {
    let (x, y): (Vec<FloatValue>, Vec<FloatValue>) =
        points.map(|point| (point.x, point.y)).unzip();
    (x.into_pyarray(py), y.into_pyarray(py))
}

fn run_sweep<'py>(
    py: Python<'py>,
    mode: CalculatorMode,
    variable: SweepVariable,
    snapshot: &ParameterSnapshot,
    target_biomass: FloatValue,
) -> PyResult<PointArrays<'py>> {
    match mode {
        CalculatorMode::Biomass => {
            let calculator = SpreadingBiomass::new();
            let points = sweep_default(&calculator, snapshot, variable).map_err(to_py_err)?;
            Ok(points_to_arrays(py, points))
        }
        CalculatorMode::Land => {
            let calculator = LandArea::new(target_biomass);
            let points = sweep_default(&calculator, snapshot, variable).map_err(to_py_err)?;
            Ok(points_to_arrays(py, points))
        }
    }
}

/// Sustainable fish biomass per hectare, as a dict of results
#[pyfunction]
#[pyo3(signature = (parameters=None))]
fn compute_biomass(
    py: Python<'_>,
    parameters: Option<Bound<'_, PyAny>>,
) -> PyResult<Py<PyAny>> {
    let snapshot = snapshot_from(parameters)?;
    Ok(to_dict(py, &SpreadingBiomass.calculate(&snapshot))?.unbind())
}

/// Land needed for `target_biomass` kg of fish, as a dict of results
#[pyfunction]
#[pyo3(signature = (target_biomass, parameters=None))]
fn compute_area(
    py: Python<'_>,
    target_biomass: FloatValue,
    parameters: Option<Bound<'_, PyAny>>,
) -> PyResult<Py<PyAny>> {
    let snapshot = snapshot_from(parameters)?;
    let results = LandArea::new(target_biomass).calculate(&snapshot);
    Ok(to_dict(py, &results)?.unbind())
}

/// Sweep one variable over its default range, returning `(x, y)` arrays
#[pyfunction]
#[pyo3(signature = (mode, variable, parameters=None, target_biomass=None))]
fn sweep<'py>(
    py: Python<'py>,
    mode: &str,
    variable: &str,
    parameters: Option<Bound<'py, PyAny>>,
    target_biomass: Option<FloatValue>,
) -> PyResult<PointArrays<'py>> {
    let mode: CalculatorMode = mode.parse().map_err(to_py_err)?;
    let variable: SweepVariable = variable.parse().map_err(to_py_err)?;
    let snapshot = snapshot_from(parameters)?;
    run_sweep(
        py,
        mode,
        variable,
        &snapshot,
        target_biomass.unwrap_or(DEFAULT_TARGET_BIOMASS),
    )
}

#[pyfunction]
fn default_parameters(py: Python<'_>) -> PyResult<Py<PyAny>> {
    Ok(to_dict(py, &ParameterSnapshot::default())?.unbind())
}

/// Parameter store driven by input fields
#[pyclass(name = "ParameterStore")]
#[derive(Debug, Clone, Default)]
pub struct PyParameterStore(pub ParameterStore);

#[pymethods]
impl PyParameterStore {
    #[new]
    #[pyo3(signature = (parameters=None, target_biomass=5000.0))]
    fn new(parameters: Option<Bound<'_, PyAny>>, target_biomass: FloatValue) -> PyResult<Self> {
        let snapshot = snapshot_from(parameters)?;
        Ok(Self(ParameterStore::new(snapshot, target_biomass)))
    }

    /// Load a store from a TOML scenario
    #[staticmethod]
    fn from_toml(source: &str) -> PyResult<Self> {
        let scenario = Scenario::from_toml_str(source).map_err(to_py_err)?;
        Ok(Self(ParameterStore::from_scenario(&scenario)))
    }

    /// Apply an edit typed into an input field
    fn on_field_change(&mut self, group: &str, field: &str, raw: &str) -> PyResult<()> {
        let group: ParameterGroup = group.parse().map_err(to_py_err)?;
        self.0
            .on_field_change(group, field, raw)
            .map_err(to_py_err)
    }

    fn snapshot(&self, py: Python<'_>) -> PyResult<Py<PyAny>> {
        Ok(to_dict(py, self.0.snapshot())?.unbind())
    }

    #[getter]
    fn target_biomass(&self) -> FloatValue {
        self.0.target_biomass()
    }

    fn compute_biomass(&self, py: Python<'_>) -> PyResult<Py<PyAny>> {
        Ok(to_dict(py, &self.0.evaluate(&SpreadingBiomass))?.unbind())
    }

    fn compute_area(&self, py: Python<'_>) -> PyResult<Py<PyAny>> {
        let calculator = LandArea::from_store(&self.0);
        Ok(to_dict(py, &self.0.evaluate(&calculator))?.unbind())
    }

    fn sweep<'py>(
        &self,
        py: Python<'py>,
        mode: &str,
        variable: &str,
    ) -> PyResult<PointArrays<'py>> {
        let mode: CalculatorMode = mode.parse().map_err(to_py_err)?;
        let variable: SweepVariable = variable.parse().map_err(to_py_err)?;
        run_sweep(
            py,
            mode,
            variable,
            self.0.snapshot(),
            self.0.target_biomass(),
        )
    }

    fn __repr__(&self) -> String {
        format!("{:?}", self.0)
    }
}

#[pymodule]
#[pyo3(name = "_lib")]
fn sludgecalc(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    m.add_function(wrap_pyfunction!(compute_biomass, m)?)?;
    m.add_function(wrap_pyfunction!(compute_area, m)?)?;
    m.add_function(wrap_pyfunction!(sweep, m)?)?;
    m.add_function(wrap_pyfunction!(default_parameters, m)?)?;
    m.add_class::<PyParameterStore>()?;
    Ok(())
}
