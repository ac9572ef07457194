//! The pyo3 half of the sandbox: one `__main__`-backed session whose helper
//! functions come from `prelude.py`. Helpers hand results back as dicts so
//! nothing here needs to interpret Python exceptions in flight.

use anyhow::{Result, anyhow};
use pyo3::prelude::*;
use pyo3::types::{PyAnyMethods, PyDict, PyDictMethods, PyModule, PyModuleMethods};
use std::ffi::CString;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ScriptOutcome {
    Completed {
        stdout: String,
        stderr: String,
        logs: String,
    },
    Failed {
        exc_type: String,
        message: String,
    },
    DeadlineExceeded,
}

pub(crate) struct SandboxSession {
    main_module: Py<PyModule>,
}

impl SandboxSession {
    /// Imports `__main__`, installs the prelude and binds the given flowsheet
    /// object names into the session registry. Re-initializing in the same
    /// process resets the mock environment but keeps the interpreter.
    pub(crate) fn initialize(object_names: &[String]) -> Result<Self> {
        Python::attach(|py| -> Result<Self> {
            let main_module = PyModule::import(py, "__main__")?;
            Self::install_prelude(py, &main_module)?;
            Self::bind_objects(&main_module, object_names)?;
            Self::health_check(py, &main_module)?;

            Ok(Self {
                main_module: main_module.unbind(),
            })
        })
    }

    pub(crate) fn run_script(&self, code: &str, timeout_seconds: f64) -> Result<ScriptOutcome> {
        Python::attach(|py| -> Result<ScriptOutcome> {
            let main = self.main_module.bind(py);
            let result =
                Self::call_helper(&main, "_dwsimagent_run_script", (code, timeout_seconds))?;

            let status = Self::dict_string(&result, "status")?;
            match status.as_str() {
                "ok" => Ok(ScriptOutcome::Completed {
                    stdout: Self::dict_string(&result, "stdout")?,
                    stderr: Self::dict_string(&result, "stderr")?,
                    logs: Self::dict_string(&result, "logs")?,
                }),
                "error" => Ok(ScriptOutcome::Failed {
                    exc_type: Self::dict_string(&result, "exc_type")?,
                    message: Self::dict_string(&result, "message")?,
                }),
                "timeout" => Ok(ScriptOutcome::DeadlineExceeded),
                other => anyhow::bail!("unknown sandbox run status: {other}"),
            }
        })
    }

    fn install_prelude(py: Python<'_>, main_module: &Bound<'_, PyModule>) -> Result<()> {
        let globals = main_module.dict();
        let prelude = CString::new(include_str!("prelude.py"))?;
        py.run(prelude.as_c_str(), Some(&globals), Some(&globals))?;
        Ok(())
    }

    fn bind_objects(main_module: &Bound<'_, PyModule>, object_names: &[String]) -> Result<()> {
        let names: Vec<&str> = object_names.iter().map(String::as_str).collect();
        let _ = Self::call_helper(main_module, "_dwsimagent_bind_objects", (names,))?;
        Ok(())
    }

    fn health_check(py: Python<'_>, main_module: &Bound<'_, PyModule>) -> PyResult<()> {
        let globals = main_module.dict();
        let _ = py.eval(c"1 + 1", Some(&globals), Some(&globals))?;
        Ok(())
    }

    fn call_helper<'py, A>(
        main_module: &Bound<'py, PyModule>,
        helper_name: &str,
        args: A,
    ) -> Result<Bound<'py, pyo3::types::PyAny>>
    where
        A: pyo3::call::PyCallArgs<'py>,
    {
        let helper = main_module.getattr(helper_name)?;
        let result = helper.call1(args)?;
        Ok(result)
    }

    fn dict_string(result: &Bound<'_, pyo3::types::PyAny>, key: &str) -> Result<String> {
        let dict = result
            .cast::<PyDict>()
            .map_err(|err| anyhow!(err.to_string()))?;
        Ok(dict
            .get_item(key)?
            .ok_or_else(|| anyhow!("missing {key} in helper result"))?
            .extract()?)
    }
}
